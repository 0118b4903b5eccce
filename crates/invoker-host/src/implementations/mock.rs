//! Mock callee used to observe batch execution from the target's side.
//!
//! One entrypoint mutates state and records the observed sender, one always
//! reverts. Balance bookkeeping lives in the chain, not here.

use crate::{CallFrame, CallOutcome, Callee, Chain, HostError};
use alloy_primitives::{Address, Bytes, U256};
use std::any::Any;

/// Selector of the increment entrypoint.
pub const INCREMENT_SELECTOR: [u8; 4] = [0xd0, 0x9d, 0xe0, 0x8a];
/// Selector of the always-reverting entrypoint.
pub const CAUSE_REVERT_SELECTOR: [u8; 4] = [0x67, 0x19, 0x2b, 0x63];

/// Gas the increment entrypoint reports consuming.
const INCREMENT_GAS: u64 = 5_000;

/// In-memory callee recording what the substrate delivered to it.
#[derive(Debug, Clone, Default)]
pub struct MockCallee {
	counter: U256,
	last_sender: Option<Address>,
}

impl MockCallee {
	/// Creates a fresh mock with zeroed state.
	pub fn new() -> Self {
		Self::default()
	}

	/// How many increments have executed against this mock.
	pub fn counter(&self) -> U256 {
		self.counter
	}

	/// The sender the most recent increment observed.
	pub fn last_sender(&self) -> Option<Address> {
		self.last_sender
	}
}

impl Callee for MockCallee {
	fn call(&mut self, frame: &CallFrame) -> Result<CallOutcome, HostError> {
		let selector: [u8; 4] = frame
			.data
			.get(..4)
			.and_then(|bytes| bytes.try_into().ok())
			.ok_or_else(|| HostError::Reverted("mock: calldata shorter than a selector".into()))?;

		match selector {
			INCREMENT_SELECTOR => {
				self.counter += U256::from(1);
				self.last_sender = Some(frame.sender);
				Ok(CallOutcome {
					gas_used: U256::from(INCREMENT_GAS),
					output: Bytes::new(),
				})
			},
			CAUSE_REVERT_SELECTOR => Err(HostError::Reverted("mock: causeRevert".into())),
			_ => Err(HostError::Reverted("mock: unknown selector".into())),
		}
	}

	fn clone_box(&self) -> Box<dyn Callee> {
		Box::new(self.clone())
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// Looks up the mock registered at `address` for state inspection.
pub fn state_of<'a>(chain: &'a Chain, address: &Address) -> Option<&'a MockCallee> {
	chain
		.callee(address)
		.and_then(|callee| callee.as_any().downcast_ref::<MockCallee>())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn frame(data: Bytes) -> CallFrame {
		CallFrame {
			sender: Address::repeat_byte(0x01),
			value: U256::ZERO,
			gas_limit: U256::from(1_000_000u64),
			data,
		}
	}

	#[test]
	fn test_increment_counts_and_records_sender() {
		let mut mock = MockCallee::new();

		mock.call(&frame(Bytes::from(INCREMENT_SELECTOR.to_vec())))
			.unwrap();
		mock.call(&frame(Bytes::from(INCREMENT_SELECTOR.to_vec())))
			.unwrap();

		assert_eq!(mock.counter(), U256::from(2u64));
		assert_eq!(mock.last_sender(), Some(Address::repeat_byte(0x01)));
	}

	#[test]
	fn test_cause_revert_fails() {
		let mut mock = MockCallee::new();

		let result = mock.call(&frame(Bytes::from(CAUSE_REVERT_SELECTOR.to_vec())));
		assert!(matches!(result, Err(HostError::Reverted(_))));
		assert_eq!(mock.counter(), U256::ZERO);
	}

	#[test]
	fn test_unknown_selector_fails() {
		let mut mock = MockCallee::new();

		let result = mock.call(&frame(Bytes::from(vec![0xde, 0xad, 0xbe, 0xef])));
		assert!(matches!(result, Err(HostError::Reverted(_))));
	}
}
