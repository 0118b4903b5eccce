//! Local private-key signer implementation.

use crate::{SignerError, SignerInterface};
use alloy_primitives::{Address, B256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use invoker_types::SignatureData;

/// Signer backed by an in-process secp256k1 private key.
pub struct LocalSigner {
	signer: PrivateKeySigner,
}

impl LocalSigner {
	/// Creates a signer from a hex-encoded private key, with or without a
	/// `0x` prefix.
	pub fn from_hex_key(key: &str) -> Result<Self, SignerError> {
		let signer: PrivateKeySigner = key
			.parse()
			.map_err(|_| SignerError::InvalidKey("Invalid private key format".to_string()))?;
		Ok(Self { signer })
	}

	/// Creates a signer with a freshly generated key. Test convenience.
	pub fn random() -> Self {
		Self {
			signer: PrivateKeySigner::random(),
		}
	}
}

#[async_trait]
impl SignerInterface for LocalSigner {
	fn address(&self) -> Address {
		self.signer.address()
	}

	async fn sign_digest(&self, digest: &B256) -> Result<SignatureData, SignerError> {
		let signature = self
			.signer
			.sign_hash_sync(digest)
			.map_err(|e| SignerError::SigningFailed(e.to_string()))?;

		Ok(SignatureData {
			r: B256::from(signature.r().to_be_bytes::<32>()),
			s: B256::from(signature.s().to_be_bytes::<32>()),
			v: signature.v(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_sign_digest_is_deterministic() {
		let signer = LocalSigner::random();
		let digest = B256::repeat_byte(0x42);

		let first = signer.sign_digest(&digest).await.unwrap();
		let second = signer.sign_digest(&digest).await.unwrap();

		// RFC 6979 signing: same key and digest, same signature
		assert_eq!(first, second);
		assert_ne!(first.r, B256::ZERO);
		assert_ne!(first.s, B256::ZERO);
	}

	#[tokio::test]
	async fn test_distinct_digests_sign_differently() {
		let signer = LocalSigner::random();

		let one = signer.sign_digest(&B256::repeat_byte(0x01)).await.unwrap();
		let two = signer.sign_digest(&B256::repeat_byte(0x02)).await.unwrap();

		assert_ne!((one.r, one.s), (two.r, two.s));
	}

	#[test]
	fn test_rejects_malformed_key() {
		assert!(matches!(
			LocalSigner::from_hex_key("not a key"),
			Err(SignerError::InvalidKey(_))
		));
	}
}
