//! Signing module for the invoker system.
//!
//! This module provides the off-band collaborator that produces batch
//! authorizations for tests, tooling and the demo service. The engine never
//! trusts this code; it only trusts the cryptographic verification on its
//! own side.

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use invoker_types::SignatureData;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Errors that can occur during signing operations.
#[derive(Debug, Error)]
pub enum SignerError {
	/// Error that occurs when signing operations fail.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// Error that occurs when a cryptographic key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Trait defining the interface for signer implementations.
///
/// This trait must be implemented by any signer that wants to produce batch
/// authorizations. It exposes the signing identity and a primitive for
/// signing precomputed 32-byte digests.
#[async_trait]
pub trait SignerInterface: Send + Sync {
	/// Returns the address corresponding to the signing key.
	fn address(&self) -> Address;

	/// Signs a precomputed 32-byte digest.
	///
	/// The digest is expected to already carry all domain separation; this
	/// method adds nothing on top.
	async fn sign_digest(&self, digest: &B256) -> Result<SignatureData, SignerError>;
}

/// Service that manages signing operations.
///
/// This struct provides a high-level interface for signing, wrapping an
/// underlying signer implementation.
pub struct SigningService {
	/// The underlying signer implementation.
	implementation: Box<dyn SignerInterface>,
}

impl SigningService {
	/// Creates a new SigningService with the specified implementation.
	pub fn new(implementation: Box<dyn SignerInterface>) -> Self {
		Self { implementation }
	}

	/// Returns the address of the managed signing key.
	pub fn address(&self) -> Address {
		self.implementation.address()
	}

	/// Signs a precomputed digest with the managed key.
	pub async fn sign_digest(&self, digest: &B256) -> Result<SignatureData, SignerError> {
		self.implementation.sign_digest(digest).await
	}
}
