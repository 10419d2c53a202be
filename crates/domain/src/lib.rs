//! pagewatch domain crate
//!
//! This crate contains the core change-detection logic following hexagonal
//! architecture:
//! - `model`: Domain entities and value objects
//! - `ports`: Trait definitions for external dependencies (adapters)
//! - `usecases`: Normalization, diffing, title resolution, and the check loop

pub mod model;
pub mod ports;
pub mod usecases;

pub use model::*;
pub use ports::*;

use sha2::{Digest, Sha256};

/// Compute the content hash of a fetched page body.
///
/// Equal hashes short-circuit a check cycle before any diffing or link
/// resolution happens.
pub fn content_hash(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    format!("{:x}", hasher.finalize())
}
