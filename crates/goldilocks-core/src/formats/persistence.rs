//! Binary format for round-constant tables.
//!
//! ```text
//! MAGIC "GLRC" (4) | VERSION (1) | PAYLOAD_LEN u32 LE (4) | PAYLOAD | SHA3-256(PAYLOAD) (32)
//! ```
//!
//! The payload is the postcard encoding of a [`RoundConstants`].

use crate::error::{GoldilocksError, Result};
use crate::rescue::RoundConstants;
use alloc::vec::Vec;
use sha3::{Digest, Sha3_256};

/// File magic.
pub const MAGIC: [u8; 4] = *b"GLRC";

/// Current format version.
pub const FORMAT_VERSION: u8 = 1;

/// Magic + version + payload length.
pub const HEADER_LEN: usize = 9;

/// SHA3-256 output length.
pub const CHECKSUM_LEN: usize = 32;

/// Encode a constants table into the binary format.
pub fn encode_constants(constants: &RoundConstants) -> Result<Vec<u8>> {
    let payload = postcard::to_allocvec(constants).map_err(GoldilocksError::Encoding)?;
    frame(&payload)
}

/// Decode and validate a constants table.
///
/// Checks run in order: length, magic, version, checksum, postcard decode,
/// then parameter validity and value count. Content is not re-derived here;
/// call [`RoundConstants::verify`] for that.
pub fn decode_constants(bytes: &[u8]) -> Result<RoundConstants> {
    if bytes.len() < HEADER_LEN {
        return Err(GoldilocksError::Truncated);
    }
    if bytes[..4] != MAGIC {
        return Err(GoldilocksError::BadMagic);
    }
    let version = bytes[4];
    if version != FORMAT_VERSION {
        return Err(GoldilocksError::UnsupportedVersion(version));
    }

    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&bytes[5..HEADER_LEN]);
    let payload_len = u32::from_le_bytes(len_bytes) as usize;

    let body = &bytes[HEADER_LEN..];
    let expected = payload_len
        .checked_add(CHECKSUM_LEN)
        .ok_or(GoldilocksError::Truncated)?;
    if body.len() < expected {
        return Err(GoldilocksError::Truncated);
    }
    if body.len() > expected {
        return Err(GoldilocksError::TrailingBytes(body.len() - expected));
    }

    let (payload, checksum) = body.split_at(payload_len);
    if Sha3_256::digest(payload).as_slice() != checksum {
        return Err(GoldilocksError::ChecksumMismatch);
    }

    let table: RoundConstants =
        postcard::from_bytes(payload).map_err(GoldilocksError::Encoding)?;
    let (params, values) = table.into_parts();
    RoundConstants::from_parts(params, values)
}

/// Wrap a payload in header and checksum.
fn frame(payload: &[u8]) -> Result<Vec<u8>> {
    let payload_len = u32::try_from(payload.len())
        .map_err(|_| GoldilocksError::InvalidParameters("constants table too large to encode"))?;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len() + CHECKSUM_LEN);
    out.extend_from_slice(&MAGIC);
    out.push(FORMAT_VERSION);
    out.extend_from_slice(&payload_len.to_le_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(Sha3_256::digest(payload).as_slice());
    Ok(out)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ZERO;
    use crate::rescue::RescueParams;
    use alloc::vec;

    fn sample() -> RoundConstants {
        let params = RescueParams::new(3, 2, 2, 128).expect("valid params");
        RoundConstants::generate(&params).expect("valid params")
    }

    #[test]
    fn round_trip() {
        let table = sample();
        let bytes = encode_constants(&table).expect("encodes");
        assert_eq!(&bytes[..4], b"GLRC");
        assert_eq!(bytes[4], FORMAT_VERSION);
        assert_eq!(decode_constants(&bytes), Ok(table));
    }

    #[test]
    fn rejects_short_input() {
        assert_eq!(decode_constants(b"GLRC"), Err(GoldilocksError::Truncated));

        let bytes = encode_constants(&sample()).expect("encodes");
        assert_eq!(
            decode_constants(&bytes[..bytes.len() - 1]),
            Err(GoldilocksError::Truncated)
        );
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = encode_constants(&sample()).expect("encodes");
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(decode_constants(&bytes), Err(GoldilocksError::TrailingBytes(2)));
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = encode_constants(&sample()).expect("encodes");
        bytes[0] = b'X';
        assert_eq!(decode_constants(&bytes), Err(GoldilocksError::BadMagic));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut bytes = encode_constants(&sample()).expect("encodes");
        bytes[4] = 9;
        assert_eq!(
            decode_constants(&bytes),
            Err(GoldilocksError::UnsupportedVersion(9))
        );
    }

    #[test]
    fn rejects_corrupted_payload() {
        let mut bytes = encode_constants(&sample()).expect("encodes");
        bytes[HEADER_LEN + 3] ^= 0x01;
        assert_eq!(decode_constants(&bytes), Err(GoldilocksError::ChecksumMismatch));
    }

    #[test]
    fn rejects_wrong_value_count() {
        let params = RescueParams::new(3, 2, 2, 128).expect("valid params");
        let payload = postcard::to_allocvec(&(params, vec![ZERO; 5])).expect("encodes");
        let bytes = frame(&payload).expect("frames");
        assert_eq!(
            decode_constants(&bytes),
            Err(GoldilocksError::ConstantCountMismatch {
                expected: 12,
                actual: 5
            })
        );
    }

    #[test]
    fn rejects_undecodable_payload() {
        let bytes = frame(&[0xff; 3]).expect("frames");
        assert!(matches!(
            decode_constants(&bytes),
            Err(GoldilocksError::Encoding(_))
        ));
    }
}
