//! Batch execution engine for the invoker system.
//!
//! This crate is the authorization and execution core: typed-data hashing
//! with domain separation, signature-to-principal binding, nonce-based
//! replay prevention, and ordered all-or-nothing execution of signed call
//! batches against the substrate. Three engine variants exist; they share
//! this core and differ only in how the acting principal is established,
//! which is captured behind a pluggable policy.

use alloy_primitives::U256;
use thiserror::Error;

/// The engine itself and its invocation surface.
pub mod engine;
/// Per-principal replay protection.
pub mod nonce;
/// Principal-resolution policies.
pub mod policy;
/// Typed-data schemas and hashing.
pub mod typed_data;
/// Signature recovery.
pub mod verify;

pub use engine::{InvokeReceipt, Invoker, InvokerVariant, SubmissionContext};
pub use nonce::NonceRegistry;
pub use policy::{DelegatedAuthorization, ExplicitSigner, PrincipalPolicy};
pub use typed_data::{MessageSchema, TypedData, TRANSACTION_PAYLOAD_TYPE};
pub use verify::recover_signer;

/// Errors produced by a failed invocation.
///
/// Every failure aborts the whole invocation and reverses all state staged
/// during it; the authorization (signature + nonce) stays valid and
/// resubmittable until an invocation with its nonce settles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
	/// The message carries no calls.
	#[error("No transaction payload")]
	EmptyPayload,
	/// Signature recovery failed, or the recovered principal is not the
	/// one the message or calling context requires.
	#[error("Invalid signature")]
	InvalidSignature,
	/// The claimed nonce does not match the registry's current value.
	#[error("Invalid nonce")]
	InvalidNonce,
	/// A call in the batch failed.
	#[error("Transaction failed: {0}")]
	CallFailed(String),
	/// Value remained in the engine after all calls succeeded.
	#[error("Invalid balance: {residual} left in the engine")]
	ValueNotConserved { residual: U256 },
}
