//! In-memory record store for the invoker system.
//!
//! This module provides a memory-based implementation of the RecordStore
//! trait, useful for tests where persistence across runs is not wanted.

use crate::{DeploymentRecord, RecordStore, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory record store implementation.
///
/// Holds at most one record behind a read-write lock. Nothing survives the
/// process.
pub struct MemoryStore {
	/// The current record, if any.
	record: Arc<RwLock<Option<DeploymentRecord>>>,
}

impl MemoryStore {
	/// Creates a new, empty MemoryStore instance.
	pub fn new() -> Self {
		Self {
			record: Arc::new(RwLock::new(None)),
		}
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl RecordStore for MemoryStore {
	async fn load(&self) -> Result<DeploymentRecord, StoreError> {
		let record = self.record.read().await;
		record.clone().ok_or(StoreError::NotFound)
	}

	async fn save(&self, record: &DeploymentRecord) -> Result<(), StoreError> {
		let mut slot = self.record.write().await;
		*slot = Some(record.clone());
		Ok(())
	}

	async fn clear(&self) -> Result<(), StoreError> {
		let mut slot = self.record.write().await;
		*slot = None;
		Ok(())
	}

	async fn exists(&self) -> Result<bool, StoreError> {
		let record = self.record.read().await;
		Ok(record.is_some())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::Address;

	fn record() -> DeploymentRecord {
		DeploymentRecord {
			chain_id: 4056,
			invoker: Address::repeat_byte(0x01),
			mock: Address::repeat_byte(0x02),
		}
	}

	#[tokio::test]
	async fn test_basic_operations() {
		let store = MemoryStore::new();

		// Missing record reports NotFound
		assert!(matches!(store.load().await, Err(StoreError::NotFound)));
		assert!(!store.exists().await.unwrap());

		// Save and load
		store.save(&record()).await.unwrap();
		assert_eq!(store.load().await.unwrap(), record());
		assert!(store.exists().await.unwrap());

		// Clear
		store.clear().await.unwrap();
		assert!(!store.exists().await.unwrap());
	}

	#[tokio::test]
	async fn test_overwrite() {
		let store = MemoryStore::new();

		store.save(&record()).await.unwrap();

		let mut updated = record();
		updated.chain_id = 1;
		store.save(&updated).await.unwrap();

		assert_eq!(store.load().await.unwrap().chain_id, 1);
	}
}
