//! # Formats Module
//!
//! Serialization of round-constant tables.
//!
//! This module only converts between values and bytes. Reading and writing
//! files stays in the app layer (apps/goldilocks).

mod persistence;

pub use persistence::*;
