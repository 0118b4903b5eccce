//! In-memory execution substrate for the invoker system.
//!
//! This module provides the world the engine executes batches against:
//! account balances, registered callees, and the low-level call primitive
//! with snapshot/restore for transactional runs. Execution is fully
//! synchronous inside one call; concurrent access goes through the shared
//! handle, which serializes whole invocations.

use alloy_primitives::{Address, Bytes, U256};
use std::any::Any;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

mod chain;

pub use chain::Chain;

/// Re-export implementations
pub mod implementations {
	pub mod mock;
}

/// Errors that can occur during substrate execution.
#[derive(Debug, Error)]
pub enum HostError {
	/// Error that occurs when a callee rejects a call.
	#[error("Call reverted: {0}")]
	Reverted(String),
	/// Error that occurs when an account cannot cover a value transfer.
	#[error("Insufficient balance in {account}: have {have}, need {need}")]
	InsufficientBalance {
		account: Address,
		have: U256,
		need: U256,
	},
	/// Error that occurs when a callee consumes more than its gas budget.
	#[error("Out of gas: used {used}, limit {limit}")]
	OutOfGas { used: U256, limit: U256 },
}

/// One low-level invocation as seen by a callee.
#[derive(Debug, Clone)]
pub struct CallFrame {
	/// The account the callee observes as sender.
	pub sender: Address,
	/// Native value attached to the call.
	pub value: U256,
	/// Hard gas budget for the call.
	pub gas_limit: U256,
	/// Raw calldata; the first four bytes select the entrypoint.
	pub data: Bytes,
}

/// Result of a successful call.
#[derive(Debug, Clone, Default)]
pub struct CallOutcome {
	/// Gas the callee reports having consumed.
	pub gas_used: U256,
	/// Return payload.
	pub output: Bytes,
}

/// A stateful in-memory callee addressed by the substrate.
///
/// Implementations own their state and must be clonable through the box so
/// the substrate can snapshot the whole world before a transactional run.
/// Sharing state outside the box (e.g. through an `Arc`) would escape the
/// snapshot and break rollback.
pub trait Callee: Send + Sync {
	/// Executes a call against this callee. The value in `frame` has
	/// already been credited to the callee's account when this runs.
	fn call(&mut self, frame: &CallFrame) -> Result<CallOutcome, HostError>;

	/// Clones the callee including its current state.
	fn clone_box(&self) -> Box<dyn Callee>;

	/// Upcast for state inspection in tests and tooling.
	fn as_any(&self) -> &dyn Any;
}

impl Clone for Box<dyn Callee> {
	fn clone(&self) -> Self {
		self.clone_box()
	}
}

/// Shared handle to a [`Chain`].
///
/// The write guard is the serialization point the engine relies on: one
/// invocation runs to completion (commit or rollback) before the next one
/// that touches the same world begins.
#[derive(Clone, Default)]
pub struct SharedChain {
	inner: Arc<RwLock<Chain>>,
}

impl SharedChain {
	/// Wraps an existing chain.
	pub fn new(chain: Chain) -> Self {
		Self {
			inner: Arc::new(RwLock::new(chain)),
		}
	}

	/// Registers a callee at `address`.
	pub async fn register(&self, address: Address, callee: Box<dyn Callee>) {
		self.inner.write().await.register(address, callee);
	}

	/// Credits `amount` to `address`.
	pub async fn fund(&self, address: Address, amount: U256) {
		self.inner.write().await.fund(address, amount);
	}

	/// Current balance of `address`.
	pub async fn balance_of(&self, address: Address) -> U256 {
		self.inner.read().await.balance_of(&address)
	}

	/// Read access to the whole world.
	pub async fn read(&self) -> RwLockReadGuard<'_, Chain> {
		self.inner.read().await
	}

	/// Exclusive access to the whole world, held for a full invocation.
	pub async fn write(&self) -> RwLockWriteGuard<'_, Chain> {
		self.inner.write().await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::implementations::mock::MockCallee;

	#[tokio::test]
	async fn test_shared_chain_setup_helpers() {
		let chain = SharedChain::default();
		let account = Address::repeat_byte(0x01);
		let target = Address::repeat_byte(0x02);

		chain.fund(account, U256::from(7u64)).await;
		chain.register(target, Box::new(MockCallee::new())).await;

		assert_eq!(chain.balance_of(account).await, U256::from(7u64));
		assert!(chain.read().await.callee(&target).is_some());
	}
}
