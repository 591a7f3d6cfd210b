//! # Permutation
//!
//! The Rescue-XLIX permutation. A `Rescue` owns everything derived from its
//! parameters (round constants and MDS matrix and its inverse), so building one is
//! the expensive step and permuting is cheap. See [`crate::cache`] for
//! reusing built instances.

use super::{ALPHA, INV_ALPHA, MdsMatrix, RescueParams, RoundConstants};
use crate::error::{GoldilocksError, Result};
use crate::field::FieldElement;

/// A Rescue-XLIX instance for one parameter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rescue {
    params: RescueParams,
    mds: MdsMatrix,
    mds_inv: MdsMatrix,
    constants: RoundConstants,
    digest_len: usize,
}

impl Rescue {
    /// Validate `params`, derive the round constants and build the MDS matrix.
    ///
    /// The digest length defaults to `min(capacity, rate)`.
    pub fn new(params: RescueParams) -> Result<Self> {
        let constants = RoundConstants::generate(&params)?;
        Self::from_constants(constants)
    }

    /// Build from an existing constants table (for example one loaded from disk).
    pub fn from_constants(constants: RoundConstants) -> Result<Self> {
        let params = *constants.params();
        params.validate()?;
        let mds = MdsMatrix::cauchy(params.width())?;
        let mds_inv = mds.inverse()?;
        Ok(Self {
            params,
            mds,
            mds_inv,
            constants,
            digest_len: params.capacity().min(params.rate()),
        })
    }

    /// Set the number of rate lanes squeezed into a digest (`1..=rate`).
    pub fn with_digest_len(mut self, digest_len: usize) -> Result<Self> {
        if digest_len == 0 || digest_len > self.params.rate() {
            return Err(GoldilocksError::InvalidDigestLength {
                requested: digest_len,
                rate: self.params.rate(),
            });
        }
        self.digest_len = digest_len;
        Ok(self)
    }

    pub fn params(&self) -> &RescueParams {
        &self.params
    }

    pub fn mds(&self) -> &MdsMatrix {
        &self.mds
    }

    pub fn constants(&self) -> &RoundConstants {
        &self.constants
    }

    pub fn digest_len(&self) -> usize {
        self.digest_len
    }

    /// Apply the permutation to `state` in place.
    pub fn permute(&self, state: &mut [FieldElement]) -> Result<()> {
        self.check_width(state)?;
        self.apply_rounds(state);
        Ok(())
    }

    /// Forward rounds; `state.len()` must equal the width.
    pub(crate) fn apply_rounds(&self, state: &mut [FieldElement]) {
        for round in 0..self.params.rounds() {
            sbox(state, ALPHA);
            self.mds.mix(state);
            self.add_constants(state, 0, round);

            sbox(state, INV_ALPHA);
            self.mds.mix(state);
            self.add_constants(state, 1, round);
        }
    }

    /// Apply the inverse permutation to `state` in place.
    pub fn inverse_permute(&self, state: &mut [FieldElement]) -> Result<()> {
        self.check_width(state)?;

        for round in (0..self.params.rounds()).rev() {
            self.sub_constants(state, 1, round);
            self.mds_inv.mix(state);
            sbox(state, ALPHA);

            self.sub_constants(state, 0, round);
            self.mds_inv.mix(state);
            sbox(state, INV_ALPHA);
        }

        Ok(())
    }

    fn check_width(&self, state: &[FieldElement]) -> Result<()> {
        if state.len() != self.params.width() {
            return Err(GoldilocksError::StateWidthMismatch {
                expected: self.params.width(),
                actual: state.len(),
            });
        }
        Ok(())
    }

    fn add_constants(&self, state: &mut [FieldElement], half: usize, round: usize) {
        if let Some(constants) = self.constants.round(half, round) {
            for (lane, constant) in state.iter_mut().zip(constants) {
                *lane += *constant;
            }
        }
    }

    fn sub_constants(&self, state: &mut [FieldElement], half: usize, round: usize) {
        if let Some(constants) = self.constants.round(half, round) {
            for (lane, constant) in state.iter_mut().zip(constants) {
                *lane -= *constant;
            }
        }
    }
}

/// Raise every lane to `power`.
fn sbox(state: &mut [FieldElement], power: u64) {
    for lane in state.iter_mut() {
        *lane = lane.exp_u64(power);
    }
}

// =============================================================================
// TESTS
// =============================================================================
