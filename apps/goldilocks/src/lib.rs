//! # Goldilocks Library
//!
//! This library exposes the CLI commands for testing and integration.
//!
//! The main binary uses these modules through the `main.rs` entry point.

pub mod cli;

// Re-export goldilocks_core for convenience
pub use goldilocks_core;
