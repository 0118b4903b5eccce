//! Batch authorization types for the invoker system.
//!
//! A principal pre-signs a [`BatchMessage`]; any sponsor may later submit it
//! for execution. The field layout of these types is load-bearing: it must
//! match the typed-data schemas the engine hashes, or signatures will not
//! verify.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// A single call inside a signed batch.
///
/// Mirrors the typed-data layout
/// `TransactionPayload(address to,uint256 value,uint256 gasLimit,bytes data)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPayload {
	/// Call target.
	pub to: Address,
	/// Native value forwarded with the call.
	pub value: U256,
	/// Hard execution budget for the call.
	pub gas_limit: U256,
	/// Raw calldata passed to the target.
	pub data: Bytes,
}

/// An ordered batch of calls authorized by one principal under one nonce.
///
/// Constructed off-engine by the principal and consumed exactly once by a
/// successful invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMessage {
	/// Declared principal. `None` for schemas that leave the principal
	/// implicit in the signature (delegated authorization).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub from: Option<Address>,
	/// The principal's replay counter at signing time.
	pub nonce: U256,
	/// Calls to execute, in order. Must be non-empty to be invokable.
	pub payload: Vec<CallPayload>,
}

impl BatchMessage {
	/// Total native value the batch forwards to its targets.
	pub fn total_value(&self) -> U256 {
		self.payload
			.iter()
			.fold(U256::ZERO, |sum, call| sum.saturating_add(call.value))
	}
}
