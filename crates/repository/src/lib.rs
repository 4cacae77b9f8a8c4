//! Versioned model repository management
//!
//! This crate implements the repository side of the sidecar: unpacking
//! uploaded archives into numbered version directories, allocating
//! version slots, patching the model configuration file to pin the
//! active version, and maintaining per-version metadata sidecars.

pub mod archive;
pub mod config;
pub mod manager;
pub mod metadata;
pub mod versioning;

// Re-export commonly used types
pub use manager::ModelRepository;
