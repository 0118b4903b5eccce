//! Per-principal replay protection.

use crate::InvokeError;
use alloy_primitives::{Address, U256};
use std::collections::HashMap;

/// Monotonic per-principal counters: the sole replay-prevention mechanism.
///
/// Owned exclusively by the engine; nothing else may mutate these values.
/// A counter starts at zero, advances by exactly one per successful
/// invocation, and never decreases.
#[derive(Debug, Clone, Default)]
pub struct NonceRegistry {
	nonces: HashMap<Address, U256>,
}

impl NonceRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current expected nonce for `principal`; zero when never seen.
	pub fn current(&self, principal: &Address) -> U256 {
		self.nonces.get(principal).copied().unwrap_or(U256::ZERO)
	}

	/// Accepts `claimed` iff it equals the current value, then advances the
	/// counter by exactly one. On mismatch nothing changes.
	///
	/// The caller owns making the advance atomic with the rest of the
	/// invocation: when a later step fails, undo it with
	/// [`NonceRegistry::reset`] while still holding the invocation lock.
	pub fn validate_and_advance(
		&mut self,
		principal: Address,
		claimed: U256,
	) -> Result<(), InvokeError> {
		let current = self.current(&principal);
		if claimed != current {
			return Err(InvokeError::InvalidNonce);
		}

		self.nonces.insert(principal, current + U256::from(1));
		Ok(())
	}

	/// Restores a principal's counter to a previously observed value.
	pub(crate) fn reset(&mut self, principal: Address, value: U256) {
		self.nonces.insert(principal, value);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unseen_principal_starts_at_zero() {
		let registry = NonceRegistry::new();
		assert_eq!(registry.current(&Address::repeat_byte(0x01)), U256::ZERO);
	}

	#[test]
	fn test_advance_by_exactly_one() {
		let mut registry = NonceRegistry::new();
		let principal = Address::repeat_byte(0x01);

		registry.validate_and_advance(principal, U256::ZERO).unwrap();
		assert_eq!(registry.current(&principal), U256::from(1u64));

		registry
			.validate_and_advance(principal, U256::from(1u64))
			.unwrap();
		assert_eq!(registry.current(&principal), U256::from(2u64));
	}

	#[test]
	fn test_mismatch_leaves_state_unchanged() {
		let mut registry = NonceRegistry::new();
		let principal = Address::repeat_byte(0x01);

		let result = registry.validate_and_advance(principal, U256::from(1u64));
		assert_eq!(result, Err(InvokeError::InvalidNonce));
		assert_eq!(registry.current(&principal), U256::ZERO);

		// stale nonce after an advance
		registry.validate_and_advance(principal, U256::ZERO).unwrap();
		let result = registry.validate_and_advance(principal, U256::ZERO);
		assert_eq!(result, Err(InvokeError::InvalidNonce));
		assert_eq!(registry.current(&principal), U256::from(1u64));
	}

	#[test]
	fn test_principals_are_independent() {
		let mut registry = NonceRegistry::new();
		let alice = Address::repeat_byte(0x01);
		let bob = Address::repeat_byte(0x02);

		registry.validate_and_advance(alice, U256::ZERO).unwrap();

		assert_eq!(registry.current(&alice), U256::from(1u64));
		assert_eq!(registry.current(&bob), U256::ZERO);
	}

	#[test]
	fn test_reset_restores_prior_value() {
		let mut registry = NonceRegistry::new();
		let principal = Address::repeat_byte(0x01);

		registry.validate_and_advance(principal, U256::ZERO).unwrap();
		registry.reset(principal, U256::ZERO);

		assert_eq!(registry.current(&principal), U256::ZERO);
	}
}
