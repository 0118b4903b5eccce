//! Explicit-signer policy: the principal is whoever signed the message.

use crate::{
	engine::SubmissionContext, typed_data::TypedData, verify::recover_signer, InvokeError,
	PrincipalPolicy,
};
use alloy_primitives::{Address, B256};
use invoker_types::{BatchMessage, SignatureData};

/// Resolves the principal as the recovered signer of the EIP-712 digest.
///
/// When the message declares a `from` field, the recovered signer must match
/// it; the declaration carries no authority of its own.
pub struct ExplicitSigner;

impl PrincipalPolicy for ExplicitSigner {
	fn digest(&self, typed: &TypedData, message: &BatchMessage) -> B256 {
		typed.signing_digest(message)
	}

	fn resolve(
		&self,
		typed: &TypedData,
		message: &BatchMessage,
		signature: &SignatureData,
		_ctx: &SubmissionContext,
	) -> Result<Address, InvokeError> {
		let digest = self.digest(typed, message);
		let recovered = recover_signer(&digest, signature)?;

		if let Some(declared) = message.from {
			if declared != recovered {
				return Err(InvokeError::InvalidSignature);
			}
		}

		Ok(recovered)
	}
}
