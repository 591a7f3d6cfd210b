//! # Goldilocks Core
//!
//! Deterministic arithmetic over the Goldilocks prime field
//! `p = 2^64 - 2^32 + 1`, and the Rescue-XLIX primitives built on it.
//!
//! ## Modules
//!
//! - [`field`]: `FieldElement` and the modular reduction it relies on
//! - [`rescue`]: round constants (SHAKE256), MDS matrix, permutation, sponge
//! - [`cache`]: LRU cache of built permutations keyed by parameters
//! - [`formats`]: binary file format for round-constant tables
//! - [`error`]: error types shared by all modules
//!
//! ## Features
//!
//! - `std` (default): std support in every dependency. Without it the crate
//!   is `no_std` + `alloc` and builds for `wasm32-unknown-unknown`.
//!
//! ```
//! use goldilocks_core::{FieldElement, Rescue, RescueParams};
//!
//! let a = FieldElement::new(7);
//! assert_eq!(a * a.inv(), FieldElement::ONE);
//!
//! let rescue = Rescue::new(RescueParams::default()).expect("default params are valid");
//! let digest = rescue.hash_elements(&[a, a.square()]);
//! assert_eq!(digest.len(), 4);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod cache;
pub mod error;
pub mod field;
pub mod formats;
pub mod rescue;

pub use cache::{CacheStats, LruCache, RescueCache};
pub use error::{FieldError, GoldilocksError, Result};
pub use field::{FieldElement, ONE, PRIME, ZERO};
pub use formats::{decode_constants, encode_constants};
pub use rescue::{
    ALPHA, INV_ALPHA, MdsMatrix, Rescue, RescueDigest, RescueParams, RoundConstants,
    compute_round_constants,
};
