//! Split secp256k1 signature representation.
//!
//! Signatures travel between the off-chain signer and the engine as their
//! raw scalar components. The engine never persists them.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// A secp256k1 signature split into its scalar components.
///
/// `v` is the raw recovery parity bit, not the legacy 27/28 encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureData {
	/// The `r` scalar.
	pub r: B256,
	/// The `s` scalar.
	pub s: B256,
	/// Recovery parity bit.
	pub v: bool,
}

impl SignatureData {
	/// Creates a signature from its components.
	pub fn new(r: B256, s: B256, v: bool) -> Self {
		Self { r, s, v }
	}

	/// The all-zero signature. Never valid; useful as a negative fixture.
	pub fn zero() -> Self {
		Self {
			r: B256::ZERO,
			s: B256::ZERO,
			v: false,
		}
	}
}
