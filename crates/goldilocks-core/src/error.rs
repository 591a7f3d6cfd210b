//! # Error Module
//!
//! Error types for field arithmetic, Rescue construction and the constants
//! file format. Both enums are `no_std` friendly (`thiserror` without std).

use thiserror::Error;

// =============================================================================
// FIELD ERRORS
// =============================================================================

/// Errors raised by `FieldElement` conversions and checked operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A little-endian encoding held a value `>= PRIME`.
    #[error("Deserialization error due to invalid value")]
    DeserializationError,

    /// A value outside the canonical range `0..PRIME` was supplied.
    #[error("Invalid value: {0} is not a canonical field element")]
    InvalidValue(u64),

    /// Zero has no multiplicative inverse.
    #[error("Zero has no multiplicative inverse")]
    ZeroInverse,

    /// A byte slice was not a whole number of 8-byte elements.
    #[error("Invalid length: {len} bytes is not a multiple of 8")]
    InvalidLength {
        /// Length of the rejected slice.
        len: usize,
    },
}

// =============================================================================
// CRATE ERRORS
// =============================================================================

/// Errors from Rescue construction, hashing and the constants file format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoldilocksError {
    /// A field-level failure.
    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    /// Rescue parameters violate `1 <= rate < width`, `rounds >= 1` or
    /// `security_level >= 1`.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(&'static str),

    /// A state slice did not match the permutation width.
    #[error("State width mismatch: expected {expected}, got {actual}")]
    StateWidthMismatch {
        /// Permutation width.
        expected: usize,
        /// Length of the supplied state.
        actual: usize,
    },

    /// Requested digest length is zero or exceeds the rate.
    #[error("Invalid digest length {requested}: must be between 1 and rate ({rate})")]
    InvalidDigestLength {
        /// Requested number of output elements.
        requested: usize,
        /// Sponge rate.
        rate: usize,
    },

    /// Input ended before the declared content.
    #[error("Truncated input")]
    Truncated,

    /// Input continues past the declared content.
    #[error("Trailing bytes after checksum: {0}")]
    TrailingBytes(usize),

    /// Input does not start with the constants file magic.
    #[error("Bad magic bytes")]
    BadMagic,

    /// Input was written by an unknown format version.
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u8),

    /// Payload checksum does not match the stored one.
    #[error("Checksum mismatch")]
    ChecksumMismatch,

    /// Postcard encoding or decoding failed.
    #[error("Encoding error: {0}")]
    Encoding(postcard::Error),

    /// A constants table holds the wrong number of values for its params.
    #[error("Constant count mismatch: expected {expected}, got {actual}")]
    ConstantCountMismatch {
        /// `2 * rounds * width`.
        expected: usize,
        /// Number of values present.
        actual: usize,
    },

    /// A constants table differs from the one derived from its params.
    #[error("Round constants do not match their parameters")]
    ConstantsMismatch,
}

/// Result type alias for goldilocks-core operations.
pub type Result<T> = core::result::Result<T, GoldilocksError>;

// =============================================================================
// TESTS
// =============================================================================
