//! Delegated-authorization policy: a one-shot grant bound to one instance.

use crate::{
	engine::SubmissionContext, typed_data::TypedData, verify::recover_signer, InvokeError,
	PrincipalPolicy,
};
use alloy_primitives::{Address, B256};
use invoker_types::{BatchMessage, SignatureData};

/// Resolves the principal through a magic-prefixed authorization digest.
///
/// The signed commitment folds in the engine instance's own address, so a
/// grant produced for one instance can never be replayed against another.
/// When the calling context designates an authority, the recovered signer
/// must be exactly that account; otherwise the recovered signer itself acts.
pub struct DelegatedAuthorization;

impl PrincipalPolicy for DelegatedAuthorization {
	fn digest(&self, typed: &TypedData, message: &BatchMessage) -> B256 {
		typed.authorization_digest(message)
	}

	fn resolve(
		&self,
		typed: &TypedData,
		message: &BatchMessage,
		signature: &SignatureData,
		ctx: &SubmissionContext,
	) -> Result<Address, InvokeError> {
		let digest = self.digest(typed, message);
		let recovered = recover_signer(&digest, signature)?;

		if let Some(authority) = ctx.authority {
			if authority != recovered {
				return Err(InvokeError::InvalidSignature);
			}
		}

		Ok(recovered)
	}
}
