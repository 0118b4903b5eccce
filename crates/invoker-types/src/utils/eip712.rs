//! Generic EIP-712 utilities shared across the invoker.
//!
//! These helpers provide:
//! - Domain separator computation
//! - Final digest computation (0x1901 || domainSeparator || structHash)
//! - The delegated-authorization commitment digest (0x03 || instance || commit)
//! - A minimal ABI encoder for the static EIP-712 field types the schemas use

use alloy_primitives::{keccak256, Address, B256, U256};

/// EIP-712 domain type used by every invoker variant.
pub const DOMAIN_TYPE: &str =
	"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Magic byte prefixing delegated-authorization commitments.
pub const AUTH_MAGIC: u8 = 0x03;

/// Compute the EIP-712 domain separator:
/// keccak256(abi.encode(typeHash, nameHash, versionHash, chainId, verifyingContract)).
pub fn compute_domain_separator(
	name: &str,
	version: &str,
	chain_id: u64,
	verifying_contract: &Address,
) -> B256 {
	let domain_type_hash = keccak256(DOMAIN_TYPE.as_bytes());
	let mut enc = Eip712AbiEncoder::new();
	enc.push_b256(&domain_type_hash);
	enc.push_b256(&keccak256(name.as_bytes()));
	enc.push_b256(&keccak256(version.as_bytes()));
	enc.push_u256(U256::from(chain_id));
	enc.push_address(verifying_contract);
	keccak256(enc.finish())
}

/// Compute the final EIP-712 digest: keccak256(0x1901 || domainSeparator || structHash).
pub fn compute_final_digest(domain_separator: &B256, struct_hash: &B256) -> B256 {
	let mut out = Vec::with_capacity(2 + 32 + 32);
	out.push(0x19);
	out.push(0x01);
	out.extend_from_slice(domain_separator.as_slice());
	out.extend_from_slice(struct_hash.as_slice());
	keccak256(out)
}

/// Compute the delegated-authorization digest:
/// keccak256(AUTH_MAGIC || pad32(instance) || commit).
///
/// Folding the instance address under the magic byte binds the commitment to
/// one engine instance, so a grant can never be replayed against another.
pub fn compute_authorization_digest(instance: &Address, commit: &B256) -> B256 {
	let mut out = Vec::with_capacity(1 + 32 + 32);
	out.push(AUTH_MAGIC);
	let mut word = [0u8; 32];
	word[12..].copy_from_slice(instance.as_slice());
	out.extend_from_slice(&word);
	out.extend_from_slice(commit.as_slice());
	keccak256(out)
}

/// Minimal ABI encoder for static types used in EIP-712 struct hashing.
pub struct Eip712AbiEncoder {
	buf: Vec<u8>,
}

impl Default for Eip712AbiEncoder {
	fn default() -> Self {
		Self::new()
	}
}

impl Eip712AbiEncoder {
	pub fn new() -> Self {
		Self { buf: Vec::new() }
	}

	pub fn push_b256(&mut self, v: &B256) {
		self.buf.extend_from_slice(v.as_slice());
	}

	pub fn push_address(&mut self, addr: &Address) {
		let mut word = [0u8; 32];
		word[12..].copy_from_slice(addr.as_slice());
		self.buf.extend_from_slice(&word);
	}

	pub fn push_u256(&mut self, v: U256) {
		let word: [u8; 32] = v.to_be_bytes::<32>();
		self.buf.extend_from_slice(&word);
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_encoder_emits_one_word_per_field() {
		let mut enc = Eip712AbiEncoder::new();
		enc.push_b256(&B256::ZERO);
		enc.push_address(&Address::repeat_byte(0x42));
		enc.push_u256(U256::from(7u64));
		let out = enc.finish();

		assert_eq!(out.len(), 3 * 32);
		// addresses are left-padded into their word
		assert_eq!(&out[32..44], &[0u8; 12]);
		assert_eq!(&out[44..64], Address::repeat_byte(0x42).as_slice());
	}

	#[test]
	fn test_domain_separator_binds_every_field() {
		let contract = Address::repeat_byte(0xaa);
		let base = compute_domain_separator("Batch Invoker", "1.0.0", 4056, &contract);

		assert_ne!(
			base,
			compute_domain_separator("Other Invoker", "1.0.0", 4056, &contract)
		);
		assert_ne!(
			base,
			compute_domain_separator("Batch Invoker", "1.0.1", 4056, &contract)
		);
		assert_ne!(
			base,
			compute_domain_separator("Batch Invoker", "1.0.0", 4057, &contract)
		);
		assert_ne!(
			base,
			compute_domain_separator("Batch Invoker", "1.0.0", 4056, &Address::repeat_byte(0xab))
		);
	}

	#[test]
	fn test_authorization_digest_binds_instance() {
		let commit = B256::repeat_byte(0x33);
		let one = compute_authorization_digest(&Address::repeat_byte(0x01), &commit);
		let two = compute_authorization_digest(&Address::repeat_byte(0x02), &commit);

		assert_ne!(one, two);
		assert_ne!(one, commit);
	}
}
