//! Signature recovery.

use crate::InvokeError;
use alloy_primitives::{keccak256, Address, B256};
use invoker_types::SignatureData;
use k256::ecdsa::{RecoveryId, Signature as RecoverableSignature, VerifyingKey};

/// Recovers the signer of `digest`.
///
/// Fails with `InvalidSignature` on malformed scalars, failed curve
/// recovery, or a zero recovered address. Never mutates state.
pub fn recover_signer(digest: &B256, signature: &SignatureData) -> Result<Address, InvokeError> {
	let parsed = RecoverableSignature::from_scalars(signature.r.0, signature.s.0)
		.map_err(|_| InvokeError::InvalidSignature)?;
	let recovery_id =
		RecoveryId::from_byte(signature.v as u8).ok_or(InvokeError::InvalidSignature)?;

	let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &parsed, recovery_id)
		.map_err(|_| InvokeError::InvalidSignature)?;

	// uncompressed SEC1 point: 0x04 || x || y; the address is the low 20
	// bytes of keccak256(x || y)
	let encoded = key.to_encoded_point(false);
	let hash = keccak256(&encoded.as_bytes()[1..]);
	let recovered = Address::from_slice(&hash[12..]);

	if recovered == Address::ZERO {
		return Err(InvokeError::InvalidSignature);
	}

	Ok(recovered)
}

#[cfg(test)]
mod tests {
	use super::*;
	use invoker_signer::{implementations::local::LocalSigner, SignerInterface};

	#[tokio::test]
	async fn test_recovers_the_signing_address() {
		let signer = LocalSigner::random();
		let digest = B256::repeat_byte(0x42);
		let signature = signer.sign_digest(&digest).await.unwrap();

		let recovered = recover_signer(&digest, &signature).unwrap();
		assert_eq!(recovered, signer.address());
	}

	#[tokio::test]
	async fn test_flipped_parity_never_recovers_the_signer() {
		let signer = LocalSigner::random();
		let digest = B256::repeat_byte(0x42);
		let mut signature = signer.sign_digest(&digest).await.unwrap();
		signature.v = !signature.v;

		match recover_signer(&digest, &signature) {
			Ok(other) => assert_ne!(other, signer.address()),
			Err(err) => assert_eq!(err, InvokeError::InvalidSignature),
		}
	}

	#[tokio::test]
	async fn test_wrong_digest_never_recovers_the_signer() {
		let signer = LocalSigner::random();
		let signature = signer.sign_digest(&B256::repeat_byte(0x42)).await.unwrap();

		match recover_signer(&B256::repeat_byte(0x43), &signature) {
			Ok(other) => assert_ne!(other, signer.address()),
			Err(err) => assert_eq!(err, InvokeError::InvalidSignature),
		}
	}

	#[test]
	fn test_zero_signature_is_rejected() {
		let result = recover_signer(&B256::repeat_byte(0x42), &SignatureData::zero());
		assert_eq!(result, Err(InvokeError::InvalidSignature));
	}
}
