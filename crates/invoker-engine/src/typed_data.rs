//! Typed-data schemas and hashing for the invoker variants.
//!
//! Every engine instance fixes a domain (name, version, chain id, its own
//! address) and a message schema at construction; the resulting type hashes
//! and domain separator are cached for the instance's lifetime and exposed
//! read-only. Hashing is pure: a message digest is a function of the message
//! fields and the domain separator, nothing else. A schema deviation does
//! not error — it silently produces a different digest — which is why the
//! type hashes are public and asserted by callers.

use alloy_primitives::{keccak256, Address, B256};
use invoker_types::{
	compute_authorization_digest, compute_domain_separator, compute_final_digest, BatchMessage,
	CallPayload, Eip712AbiEncoder, DOMAIN_TYPE,
};

/// Payload type string shared by every schema.
pub const TRANSACTION_PAYLOAD_TYPE: &str =
	"TransactionPayload(address to,uint256 value,uint256 gasLimit,bytes data)";

/// How a message schema lays out its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSchema {
	/// Whether the message declares its principal as a leading `from` field.
	pub declares_principal: bool,
	/// Name of the payload array field in the type string.
	pub payload_field: &'static str,
}

impl MessageSchema {
	/// Builds the full `Transaction(...)` type string, referenced payload
	/// type appended per EIP-712.
	fn transaction_type(&self) -> String {
		if self.declares_principal {
			format!(
				"Transaction(address from,uint256 nonce,TransactionPayload[] {}){}",
				self.payload_field, TRANSACTION_PAYLOAD_TYPE
			)
		} else {
			format!(
				"Transaction(uint256 nonce,TransactionPayload[] {}){}",
				self.payload_field, TRANSACTION_PAYLOAD_TYPE
			)
		}
	}
}

/// Hashing context of one engine instance.
#[derive(Debug, Clone)]
pub struct TypedData {
	schema: MessageSchema,
	instance: Address,
	domain_separator: B256,
	domain_type_hash: B256,
	transaction_type_hash: B256,
	payload_type_hash: B256,
}

impl TypedData {
	/// Computes and caches the domain separator and type hashes for one
	/// engine instance.
	pub fn new(
		name: &str,
		version: &str,
		chain_id: u64,
		instance: Address,
		schema: MessageSchema,
	) -> Self {
		Self {
			schema,
			instance,
			domain_separator: compute_domain_separator(name, version, chain_id, &instance),
			domain_type_hash: keccak256(DOMAIN_TYPE.as_bytes()),
			transaction_type_hash: keccak256(schema.transaction_type().as_bytes()),
			payload_type_hash: keccak256(TRANSACTION_PAYLOAD_TYPE.as_bytes()),
		}
	}

	/// The cached domain separator.
	pub fn domain_separator(&self) -> B256 {
		self.domain_separator
	}

	/// Type hash of the EIP-712 domain.
	pub fn domain_type_hash(&self) -> B256 {
		self.domain_type_hash
	}

	/// Type hash of the message schema.
	pub fn transaction_type_hash(&self) -> B256 {
		self.transaction_type_hash
	}

	/// Type hash of a single payload element.
	pub fn payload_type_hash(&self) -> B256 {
		self.payload_type_hash
	}

	/// The schema this instance hashes against.
	pub fn schema(&self) -> MessageSchema {
		self.schema
	}

	fn payload_hash(&self, payload: &CallPayload) -> B256 {
		let mut enc = Eip712AbiEncoder::new();
		enc.push_b256(&self.payload_type_hash);
		enc.push_address(&payload.to);
		enc.push_u256(payload.value);
		enc.push_u256(payload.gas_limit);
		enc.push_b256(&keccak256(&payload.data));
		keccak256(enc.finish())
	}

	/// Struct hash of the whole message. The payload array hashes as the
	/// keccak of the concatenated element struct hashes, in array order.
	pub fn struct_hash(&self, message: &BatchMessage) -> B256 {
		let mut concat = Vec::with_capacity(32 * message.payload.len());
		for payload in &message.payload {
			concat.extend_from_slice(self.payload_hash(payload).as_slice());
		}
		let payload_array_hash = keccak256(concat);

		let mut enc = Eip712AbiEncoder::new();
		enc.push_b256(&self.transaction_type_hash);
		if self.schema.declares_principal {
			enc.push_address(&message.from.unwrap_or_default());
		}
		enc.push_u256(message.nonce);
		enc.push_b256(&payload_array_hash);
		keccak256(enc.finish())
	}

	/// The digest an explicit signer signs:
	/// keccak256(0x1901 || domainSeparator || structHash).
	pub fn signing_digest(&self, message: &BatchMessage) -> B256 {
		compute_final_digest(&self.domain_separator, &self.struct_hash(message))
	}

	/// The digest a delegated authorization signs: the signing digest bound
	/// to this instance behind the magic prefix.
	pub fn authorization_digest(&self, message: &BatchMessage) -> B256 {
		compute_authorization_digest(&self.instance, &self.signing_digest(message))
	}
}
