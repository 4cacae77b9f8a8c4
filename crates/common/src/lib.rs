//! Common types for the model repository sidecar
//!
//! This crate provides shared functionality used across the sidecar
//! crates, currently the error taxonomy and result alias.

pub mod error;

// Re-export commonly used types
pub use error::{Error, Result};
