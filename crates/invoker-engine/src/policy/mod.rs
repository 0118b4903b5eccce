//! Principal-resolution policies.
//!
//! The engine variants share one execution core; how the acting principal
//! is established is the only difference between them, captured behind
//! [`PrincipalPolicy`] and injected into the engine at construction.

use crate::{engine::SubmissionContext, typed_data::TypedData, InvokeError};
use alloy_primitives::{Address, B256};
use invoker_types::{BatchMessage, SignatureData};

pub mod delegated;
pub mod explicit;

pub use delegated::DelegatedAuthorization;
pub use explicit::ExplicitSigner;

/// Strategy for binding a signature to the acting principal.
///
/// Implementations are pure: they may hash and recover, never mutate.
pub trait PrincipalPolicy: Send + Sync {
	/// The digest a principal signs to authorize `message` under this
	/// policy. Exposed so off-band signers can produce matching grants.
	fn digest(&self, typed: &TypedData, message: &BatchMessage) -> B256;

	/// Resolves and authenticates the principal for one invocation.
	///
	/// Returns the principal on success; any mismatch between signature,
	/// message and calling context is `InvalidSignature`.
	fn resolve(
		&self,
		typed: &TypedData,
		message: &BatchMessage,
		signature: &SignatureData,
		ctx: &SubmissionContext,
	) -> Result<Address, InvokeError>;
}
