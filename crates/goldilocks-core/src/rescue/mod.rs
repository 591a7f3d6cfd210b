//! # Rescue Module
//!
//! Rescue-XLIX over the Goldilocks field.
//!
//! - [`constants`]: round constants derived from SHAKE256
//! - [`mds`]: the Cauchy MDS mixing matrix
//! - [`permutation`]: the permutation itself
//! - [`sponge`]: hashing on top of the permutation
//!
//! Each round applies `x^ALPHA`, the MDS mix and the first half of the round
//! constants. It then applies `x^INV_ALPHA`, the MDS mix and the second half.

pub mod constants;
pub mod mds;
pub mod permutation;
pub mod sponge;

pub use constants::{RoundConstants, compute_round_constants};
pub use mds::MdsMatrix;
pub use permutation::Rescue;
pub use sponge::RescueDigest;

use crate::error::{GoldilocksError, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// S-BOX EXPONENTS
// =============================================================================

/// Forward S-box exponent: the smallest `a` with `gcd(a, p - 1) = 1`.
pub const ALPHA: u64 = 7;

/// Inverse S-box exponent: `ALPHA^-1 mod (p - 1)`.
pub const INV_ALPHA: u64 = 10_540_996_611_094_048_183;

// =============================================================================
// PARAMETERS
// =============================================================================

/// Default state width.
pub const DEFAULT_WIDTH: usize = 12;

/// Default sponge rate.
pub const DEFAULT_RATE: usize = 8;

/// Default number of rounds.
pub const DEFAULT_ROUNDS: usize = 7;

/// Default security level in bits.
pub const DEFAULT_SECURITY_LEVEL: usize = 128;

/// Largest accepted state width. The MDS matrix holds `width^2` elements.
pub const MAX_WIDTH: usize = 256;

/// Largest accepted round count.
pub const MAX_ROUNDS: usize = 256;

/// Shape of a Rescue instance.
///
/// `capacity = width - rate`. Construct through [`RescueParams::new`] to get
/// validation; deserialized values are validated by their consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RescueParams {
    width: usize,
    rate: usize,
    rounds: usize,
    security_level: usize,
}

impl Default for RescueParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            rate: DEFAULT_RATE,
            rounds: DEFAULT_ROUNDS,
            security_level: DEFAULT_SECURITY_LEVEL,
        }
    }
}

impl RescueParams {
    /// Create validated parameters.
    pub fn new(width: usize, rate: usize, rounds: usize, security_level: usize) -> Result<Self> {
        let params = Self {
            width,
            rate,
            rounds,
            security_level,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the parameter invariants.
    pub fn validate(&self) -> Result<()> {
        if self.width < 2 {
            return Err(GoldilocksError::InvalidParameters("width must be at least 2"));
        }
        if self.rate == 0 {
            return Err(GoldilocksError::InvalidParameters("rate must be at least 1"));
        }
        if self.rate >= self.width {
            return Err(GoldilocksError::InvalidParameters(
                "rate must be smaller than width",
            ));
        }
        if self.rounds == 0 {
            return Err(GoldilocksError::InvalidParameters("rounds must be at least 1"));
        }
        if self.security_level == 0 {
            return Err(GoldilocksError::InvalidParameters(
                "security level must be at least 1",
            ));
        }
        if self.width > MAX_WIDTH {
            return Err(GoldilocksError::InvalidParameters("width exceeds MAX_WIDTH"));
        }
        if self.rounds > MAX_ROUNDS {
            return Err(GoldilocksError::InvalidParameters("rounds exceeds MAX_ROUNDS"));
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rate(&self) -> usize {
        self.rate
    }

    /// Lanes not touched by absorption, `width - rate`.
    pub fn capacity(&self) -> usize {
        self.width.saturating_sub(self.rate)
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn security_level(&self) -> usize {
        self.security_level
    }

    /// Number of round constants, `2 * rounds * width`.
    pub fn constant_count(&self) -> usize {
        self.rounds
            .saturating_mul(self.width)
            .saturating_mul(2)
    }
}

// =============================================================================
// TESTS
// =============================================================================
