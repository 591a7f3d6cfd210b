//! # Round Constants
//!
//! Rescue-XLIX round constants derived from SHAKE256.
//!
//! The seed is the ASCII string
//! `Rescue - XLIX (<p>,<width>,<capacity>,<security_level>` (decimal, with no
//! closing parenthesis). SHAKE256 is squeezed to `9` bytes per constant. Each
//! 9-byte chunk is read little-endian and reduced modulo p. Nine bytes is
//! `ceil(64 / 8) + 1`, one byte more than an element, to flatten the bias of
//! the reduction.

use super::RescueParams;
use crate::error::{GoldilocksError, Result};
use crate::field::{FieldElement, PRIME, ZERO};
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use sha3::Shake256;
use sha3::digest::{ExtendableOutput, Update, XofReader};

/// Bytes of SHAKE256 output consumed per round constant.
pub const BYTES_PER_ELEMENT: usize = 9;

// =============================================================================
// ROUND CONSTANTS TABLE
// =============================================================================

/// Round constants for one parameter set.
///
/// `values` holds `2 * rounds * width` elements laid out as
/// `[half][round][lane]`. Half 0 is injected after the forward S-box layer,
/// half 1 after the inverse one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConstants {
    params: RescueParams,
    values: Vec<FieldElement>,
}

impl RoundConstants {
    /// Derive the constants for `params`.
    pub fn generate(params: &RescueParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params: *params,
            values: derive(params),
        })
    }

    /// Rebuild a table from stored parts, checking shape but not content.
    pub fn from_parts(params: RescueParams, values: Vec<FieldElement>) -> Result<Self> {
        params.validate()?;
        let expected = params.constant_count();
        if values.len() != expected {
            return Err(GoldilocksError::ConstantCountMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { params, values })
    }

    pub fn params(&self) -> &RescueParams {
        &self.params
    }

    /// All constants in `[half][round][lane]` order.
    pub fn values(&self) -> &[FieldElement] {
        &self.values
    }

    /// Split into params and values.
    pub fn into_parts(self) -> (RescueParams, Vec<FieldElement>) {
        (self.params, self.values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A single constant, or `None` when out of range.
    pub fn get(&self, half: usize, round: usize, lane: usize) -> Option<FieldElement> {
        if half > 1 || round >= self.params.rounds() || lane >= self.params.width() {
            return None;
        }
        self.values.get(self.offset(half, round) + lane).copied()
    }

    /// The `width` constants of one half-round, or `None` when out of range.
    pub fn round(&self, half: usize, round: usize) -> Option<&[FieldElement]> {
        if half > 1 || round >= self.params.rounds() {
            return None;
        }
        let start = self.offset(half, round);
        self.values.get(start..start + self.params.width())
    }

    /// Regenerate from `params` and compare.
    pub fn verify(&self) -> Result<()> {
        let expected = Self::generate(&self.params)?;
        if expected.values == self.values {
            Ok(())
        } else {
            Err(GoldilocksError::ConstantsMismatch)
        }
    }

    fn offset(&self, half: usize, round: usize) -> usize {
        let width = self.params.width();
        half * self.params.rounds() * width + round * width
    }
}

// =============================================================================
// CONST-GENERIC DERIVATION
// =============================================================================

/// Derive the round constants as a fixed-size `[half][round][lane]` array.
///
/// `RATE` and `WIDTH` describe the sponge, `N` is the number of rounds.
pub fn compute_round_constants<const RATE: usize, const WIDTH: usize, const N: usize>(
    security_level: usize,
) -> Result<[[[FieldElement; WIDTH]; N]; 2]> {
    let params = RescueParams::new(WIDTH, RATE, N, security_level)?;

    let mut round_constants = [[[ZERO; WIDTH]; N]; 2];
    for (i, constant) in derive(&params).into_iter().enumerate() {
        round_constants[i / (WIDTH * N)][(i / WIDTH) % N][i % WIDTH] = constant;
    }

    Ok(round_constants)
}

// =============================================================================
// HELPERS
// =============================================================================

/// Seed string fed to SHAKE256.
pub fn seed_string(params: &RescueParams) -> String {
    format!(
        "Rescue - XLIX ({},{},{},{}",
        PRIME,
        params.width(),
        params.capacity(),
        params.security_level()
    )
}

/// Derive `2 * rounds * width` constants. `params` must already be valid.
fn derive(params: &RescueParams) -> Vec<FieldElement> {
    let count = params.constant_count();
    let bytes = shake256(seed_string(params).as_bytes(), count * BYTES_PER_ELEMENT);

    bytes
        .chunks_exact(BYTES_PER_ELEMENT)
        .map(|chunk| {
            let mut buf = [0u8; 16];
            buf[..BYTES_PER_ELEMENT].copy_from_slice(chunk);
            FieldElement::from_u128(u128::from_le_bytes(buf))
        })
        .collect()
}

/// Squeeze `num_bytes` of SHAKE256 output for `input`.
fn shake256(input: &[u8], num_bytes: usize) -> Vec<u8> {
    let mut hasher = Shake256::default();
    hasher.update(input);
    let mut reader = hasher.finalize_xof();
    let mut output = vec![0u8; num_bytes];
    reader.read(&mut output);
    output
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> RescueParams {
        RescueParams::new(3, 2, 2, 128).expect("valid params")
    }

    #[test]
    fn seed_string_matches_format() {
        assert_eq!(
            seed_string(&RescueParams::default()),
            "Rescue - XLIX (18446744069414584321,12,4,128"
        );
    }

    #[test]
    fn known_constants_for_small_instance() {
        let expected: [u64; 12] = [
            18_367_704_176_076_567_412,
            15_547_420_746_595_342_002,
            11_891_086_448_973_569_636,
            4_706_260_688_967_220_682,
            6_835_280_792_322_612_781,
            17_363_832_776_080_928_498,
            3_425_192_344_890_048_913,
            164_738_826_166_434_563,
            10_530_896_792_293_402_666,
            11_603_895_193_014_758_797,
            5_930_631_164_985_473_330,
            15_321_892_960_295_695_646,
        ];

        let table = RoundConstants::generate(&small_params()).expect("valid params");
        let values: Vec<u64> = table.values().iter().map(|v| v.value()).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn known_constants_for_default_instance() {
        let table = RoundConstants::generate(&RescueParams::default()).expect("valid params");
        assert_eq!(table.len(), 168);
        assert_eq!(table.values()[0].value(), 16_378_474_442_478_210_384);
        assert_eq!(table.values()[1].value(), 5_717_303_077_328_794_701);
        assert_eq!(table.values()[2].value(), 17_627_127_958_155_359_575);
        assert_eq!(table.values()[167].value(), 9_237_032_230_961_641_373);
    }

    #[test]
    fn const_generic_layout_matches_table() {
        let table = RoundConstants::generate(&small_params()).expect("valid params");
        let array = compute_round_constants::<2, 3, 2>(128).expect("valid params");

        for half in 0..2 {
            for round in 0..2 {
                for lane in 0..3 {
                    assert_eq!(Some(array[half][round][lane]), table.get(half, round, lane));
                }
                assert_eq!(Some(&array[half][round][..]), table.round(half, round));
            }
        }
    }

    #[test]
    fn const_generic_rejects_rate_not_below_width() {
        assert!(compute_round_constants::<3, 3, 2>(128).is_err());
    }

    #[test]
    fn out_of_range_accessors_return_none() {
        let table = RoundConstants::generate(&small_params()).expect("valid params");
        assert_eq!(table.get(2, 0, 0), None);
        assert_eq!(table.get(0, 2, 0), None);
        assert_eq!(table.get(0, 0, 3), None);
        assert_eq!(table.round(0, 2), None);
    }

    #[test]
    fn from_parts_checks_count() {
        let err = RoundConstants::from_parts(small_params(), vec![ZERO; 5]);
        assert_eq!(
            err,
            Err(GoldilocksError::ConstantCountMismatch {
                expected: 12,
                actual: 5
            })
        );
    }

    #[test]
    fn verify_detects_tampering() {
        let table = RoundConstants::generate(&small_params()).expect("valid params");
        assert!(table.verify().is_ok());

        let mut values = table.values().to_vec();
        values[4] += FieldElement::ONE;
        let tampered = RoundConstants::from_parts(small_params(), values);
        assert_eq!(
            tampered.and_then(|t| t.verify()),
            Err(GoldilocksError::ConstantsMismatch)
        );
    }

    #[test]
    fn security_level_changes_constants() {
        let a = RoundConstants::generate(&small_params()).ok();
        let b = RescueParams::new(3, 2, 2, 100)
            .and_then(|p| RoundConstants::generate(&p))
            .ok();
        assert!(a.is_some() && b.is_some());
        assert_ne!(a, b);
    }
}
