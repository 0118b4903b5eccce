//! The in-memory world state: balances plus registered callees.

use crate::{CallFrame, CallOutcome, Callee, HostError};
use alloy_primitives::{Address, U256};
use std::collections::HashMap;

/// The world the engine executes against.
///
/// Single-threaded by construction: every operation takes `&mut self` or
/// `&self` directly. Concurrent use goes through
/// [`SharedChain`](crate::SharedChain).
#[derive(Clone, Default)]
pub struct Chain {
	/// Native balances per account.
	balances: HashMap<Address, U256>,
	/// Callees addressable by calls.
	callees: HashMap<Address, Box<dyn Callee>>,
}

impl Chain {
	/// Creates an empty world.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a callee at `address`, replacing any previous one.
	pub fn register(&mut self, address: Address, callee: Box<dyn Callee>) {
		self.callees.insert(address, callee);
	}

	/// Credits `amount` to `address` out of thin air. Setup primitive.
	pub fn fund(&mut self, address: Address, amount: U256) {
		let balance = self.balances.entry(address).or_default();
		*balance = balance.saturating_add(amount);
	}

	/// Current balance of `address`; zero for unknown accounts.
	pub fn balance_of(&self, address: &Address) -> U256 {
		self.balances.get(address).copied().unwrap_or(U256::ZERO)
	}

	/// The callee registered at `address`, if any.
	pub fn callee(&self, address: &Address) -> Option<&dyn Callee> {
		self.callees.get(address).map(|boxed| boxed.as_ref())
	}

	/// Moves `value` from one account to another.
	pub fn transfer(&mut self, from: Address, to: Address, value: U256) -> Result<(), HostError> {
		if value.is_zero() {
			return Ok(());
		}

		let have = self.balance_of(&from);
		if have < value {
			return Err(HostError::InsufficientBalance {
				account: from,
				have,
				need: value,
			});
		}

		self.balances.insert(from, have - value);
		self.fund(to, value);
		Ok(())
	}

	/// Executes one call: moves `frame.value` from `funding` to `to`, then
	/// dispatches the callee registered at `to`, if any. A call to an
	/// address with no callee is a plain transfer.
	///
	/// `frame.gas_limit` is a hard cap: a callee reporting consumption above
	/// it fails the call. State mutated before a failure is NOT undone here;
	/// transactional callers snapshot first and restore on error.
	pub fn execute(
		&mut self,
		funding: Address,
		to: Address,
		frame: CallFrame,
	) -> Result<CallOutcome, HostError> {
		self.transfer(funding, to, frame.value)?;

		let Some(callee) = self.callees.get_mut(&to) else {
			return Ok(CallOutcome::default());
		};

		if frame.data.is_empty() {
			// bare value transfer to a callee
			return Ok(CallOutcome::default());
		}

		let outcome = callee.call(&frame)?;
		if outcome.gas_used > frame.gas_limit {
			return Err(HostError::OutOfGas {
				used: outcome.gas_used,
				limit: frame.gas_limit,
			});
		}

		tracing::trace!(to = %to, gas_used = %outcome.gas_used, "Call completed");
		Ok(outcome)
	}

	/// Deep copy of the whole world, callee state included.
	pub fn snapshot(&self) -> Chain {
		self.clone()
	}

	/// Replaces the world with a previously taken snapshot.
	pub fn restore(&mut self, snapshot: Chain) {
		*self = snapshot;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::mock::{self, MockCallee, INCREMENT_SELECTOR};
	use alloy_primitives::Bytes;

	fn frame(sender: Address, value: u64, data: Bytes) -> CallFrame {
		CallFrame {
			sender,
			value: U256::from(value),
			gas_limit: U256::from(1_000_000u64),
			data,
		}
	}

	#[test]
	fn test_transfer_moves_balance() {
		let mut chain = Chain::new();
		let alice = Address::repeat_byte(0x01);
		let bob = Address::repeat_byte(0x02);
		chain.fund(alice, U256::from(10u64));

		chain.transfer(alice, bob, U256::from(4u64)).unwrap();

		assert_eq!(chain.balance_of(&alice), U256::from(6u64));
		assert_eq!(chain.balance_of(&bob), U256::from(4u64));
	}

	#[test]
	fn test_transfer_rejects_overdraft() {
		let mut chain = Chain::new();
		let alice = Address::repeat_byte(0x01);
		let bob = Address::repeat_byte(0x02);
		chain.fund(alice, U256::from(1u64));

		let result = chain.transfer(alice, bob, U256::from(2u64));
		assert!(matches!(
			result,
			Err(HostError::InsufficientBalance { .. })
		));
		// nothing moved
		assert_eq!(chain.balance_of(&alice), U256::from(1u64));
		assert_eq!(chain.balance_of(&bob), U256::ZERO);
	}

	#[test]
	fn test_execute_dispatches_callee() {
		let mut chain = Chain::new();
		let sender = Address::repeat_byte(0x01);
		let target = Address::repeat_byte(0x02);
		chain.fund(sender, U256::from(5u64));
		chain.register(target, Box::new(MockCallee::new()));

		chain
			.execute(
				sender,
				target,
				frame(sender, 3, Bytes::from(INCREMENT_SELECTOR.to_vec())),
			)
			.unwrap();

		let state = mock::state_of(&chain, &target).unwrap();
		assert_eq!(state.counter(), U256::from(1u64));
		assert_eq!(state.last_sender(), Some(sender));
		assert_eq!(chain.balance_of(&target), U256::from(3u64));
	}

	#[test]
	fn test_execute_enforces_gas_cap() {
		let mut chain = Chain::new();
		let sender = Address::repeat_byte(0x01);
		let target = Address::repeat_byte(0x02);
		chain.register(target, Box::new(MockCallee::new()));

		let starved = CallFrame {
			sender,
			value: U256::ZERO,
			gas_limit: U256::from(1u64),
			data: Bytes::from(INCREMENT_SELECTOR.to_vec()),
		};

		assert!(matches!(
			chain.execute(sender, target, starved),
			Err(HostError::OutOfGas { .. })
		));
	}

	#[test]
	fn test_snapshot_restores_balances_and_callee_state() {
		let mut chain = Chain::new();
		let sender = Address::repeat_byte(0x01);
		let target = Address::repeat_byte(0x02);
		chain.fund(sender, U256::from(5u64));
		chain.register(target, Box::new(MockCallee::new()));

		let snapshot = chain.snapshot();

		chain
			.execute(
				sender,
				target,
				frame(sender, 5, Bytes::from(INCREMENT_SELECTOR.to_vec())),
			)
			.unwrap();
		assert_eq!(chain.balance_of(&sender), U256::ZERO);

		chain.restore(snapshot);

		assert_eq!(chain.balance_of(&sender), U256::from(5u64));
		assert_eq!(chain.balance_of(&target), U256::ZERO);
		let state = mock::state_of(&chain, &target).unwrap();
		assert_eq!(state.counter(), U256::ZERO);
		assert_eq!(state.last_sender(), None);
	}
}
