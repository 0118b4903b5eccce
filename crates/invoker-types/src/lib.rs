//! Common types module for the batch invoker system.
//!
//! This module defines the core data types and structures shared by the
//! invoker engine and its collaborators. It provides a centralized location
//! for shared types to ensure consistency across all components.

/// Batch message and call payload types.
pub mod batch;
/// Split secp256k1 signature representation.
pub mod signature;
/// Shared hashing utilities.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use batch::*;
pub use signature::*;
pub use utils::eip712::{
	compute_authorization_digest, compute_domain_separator, compute_final_digest,
	Eip712AbiEncoder, AUTH_MAGIC, DOMAIN_TYPE,
};
pub use validation::*;
