//! # Sponge
//!
//! Hashing with the Rescue permutation.
//!
//! State layout: capacity lanes `[0, capacity)`, rate lanes `[capacity, width)`.
//! Input is padded with `ONE` followed by zeros up to a multiple of the rate,
//! so even empty input absorbs one block. Each block is added into the rate
//! lanes and followed by a permutation. The digest is the first `digest_len`
//! rate lanes.

use super::Rescue;
use crate::field::{FieldElement, ONE, ZERO, elements_to_bytes};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{Display, Formatter, Result as FmtResult};
use serde::{Deserialize, Serialize};

/// Input bytes packed into each element by [`Rescue::hash_bytes`].
pub const BYTES_PER_CHUNK: usize = 7;

// =============================================================================
// DIGEST
// =============================================================================

/// Output of the Rescue sponge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RescueDigest(Vec<FieldElement>);

impl RescueDigest {
    pub fn as_elements(&self) -> &[FieldElement] {
        &self.0
    }

    pub fn into_elements(self) -> Vec<FieldElement> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Little-endian bytes of each element, concatenated.
    pub fn to_bytes(&self) -> Vec<u8> {
        elements_to_bytes(&self.0)
    }
}

/// Lowercase hex of [`RescueDigest::to_bytes`].
impl Display for RescueDigest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for byte in self.to_bytes() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

// =============================================================================
// HASHING
// =============================================================================

impl Rescue {
    /// Hash a sequence of field elements.
    pub fn hash_elements(&self, elements: &[FieldElement]) -> RescueDigest {
        let width = self.params().width();
        let rate = self.params().rate();
        let capacity = self.params().capacity();

        let mut padded = Vec::with_capacity(elements.len() + rate);
        padded.extend_from_slice(elements);
        padded.push(ONE);
        while padded.len() % rate != 0 {
            padded.push(ZERO);
        }

        let mut state = vec![ZERO; width];
        for block in padded.chunks_exact(rate) {
            for (lane, value) in state[capacity..].iter_mut().zip(block) {
                *lane += *value;
            }
            self.apply_rounds(&mut state);
        }

        RescueDigest(state[capacity..capacity + self.digest_len()].to_vec())
    }

    /// Hash arbitrary bytes.
    ///
    /// Bytes are packed 7 per element, little-endian, with a `1` bit set just
    /// above the last byte of each chunk so trailing zero bytes change the
    /// digest. Every packed value is below `2^57 < p`.
    pub fn hash_bytes(&self, bytes: &[u8]) -> RescueDigest {
        let elements: Vec<FieldElement> = bytes
            .chunks(BYTES_PER_CHUNK)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf[..chunk.len()].copy_from_slice(chunk);
                let marker = 1u64 << (8 * chunk.len());
                FieldElement::new(u64::from_le_bytes(buf) | marker)
            })
            .collect();
        self.hash_elements(&elements)
    }

    /// Hash the concatenation of several digests.
    pub fn merge(&self, digests: &[RescueDigest]) -> RescueDigest {
        let elements: Vec<FieldElement> = digests
            .iter()
            .flat_map(|d| d.as_elements().iter().copied())
            .collect();
        self.hash_elements(&elements)
    }
}

// =============================================================================
// TESTS
// =============================================================================
