//! Slice-level helpers: batch inversion and byte packing.

use super::{FieldElement, ONE, ZERO};
use crate::error::FieldError;
use alloc::vec::Vec;

/// Invert every element with a single field inversion (Montgomery's trick).
///
/// Zeros map to zero, matching [`FieldElement::inv`].
#[must_use]
pub fn batch_inversion(values: &[FieldElement]) -> Vec<FieldElement> {
    // result[i] starts as the product of all non-zero values before i
    let mut result = Vec::with_capacity(values.len());
    let mut acc = ONE;
    for value in values {
        result.push(acc);
        if !value.is_zero() {
            acc *= *value;
        }
    }

    let mut acc_inv = acc.inv();
    for (slot, value) in result.iter_mut().zip(values).rev() {
        if value.is_zero() {
            *slot = ZERO;
        } else {
            *slot *= acc_inv;
            acc_inv *= *value;
        }
    }

    result
}

/// Parse consecutive 8-byte little-endian chunks into field elements.
pub fn elements_from_bytes(bytes: &[u8]) -> Result<Vec<FieldElement>, FieldError> {
    if bytes.len() % 8 != 0 {
        return Err(FieldError::InvalidLength { len: bytes.len() });
    }

    bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            FieldElement::from_bytes(&buf)
        })
        .collect()
}

/// Concatenate the 8-byte little-endian encodings of `elements`.
#[must_use]
pub fn elements_to_bytes(elements: &[FieldElement]) -> Vec<u8> {
    elements.iter().flat_map(|e| e.to_bytes()).collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::PRIME;
    use alloc::vec;

    #[test]
    fn batch_inversion_matches_single_inversion() {
        let values: Vec<_> = [3u64, 0, 17, PRIME - 1, 0, 1 << 40]
            .into_iter()
            .map(FieldElement::new)
            .collect();

        let inverted = batch_inversion(&values);
        let expected: Vec<_> = values.iter().map(|v| v.inv()).collect();
        assert_eq!(inverted, expected);
        assert_eq!(inverted[1], ZERO);
    }

    #[test]
    fn batch_inversion_of_empty_slice() {
        assert!(batch_inversion(&[]).is_empty());
    }

    #[test]
    fn bytes_round_trip() {
        let elements = vec![FieldElement::new(1), FieldElement::new(PRIME - 1)];
        let bytes = elements_to_bytes(&elements);
        assert_eq!(bytes.len(), 16);
        assert_eq!(elements_from_bytes(&bytes), Ok(elements));
    }

    #[test]
    fn ragged_bytes_rejected() {
        assert_eq!(
            elements_from_bytes(&[0u8; 12]),
            Err(FieldError::InvalidLength { len: 12 })
        );
    }

    #[test]
    fn non_canonical_chunk_rejected() {
        let mut bytes = vec![0u8; 8];
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        assert_eq!(
            elements_from_bytes(&bytes),
            Err(FieldError::DeserializationError)
        );
    }
}
