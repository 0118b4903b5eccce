//! Deployment tracking for the invoker system.
//!
//! This module remembers which engine and mock-callee instances a previous
//! test or bootstrap run created, so the next run can reuse them instead of
//! setting everything up again. It is purely a setup convenience and plays
//! no part in authorization or execution.

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during record-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
	/// Error that occurs when no record has been written yet.
	#[error("Not found")]
	NotFound,
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
}

/// A remembered deployment: which instances a previous run created and where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
	/// Chain the instances were created on.
	pub chain_id: u64,
	/// Address of the invoker engine instance.
	pub invoker: Address,
	/// Address of the mock callee used to observe executions.
	pub mock: Address,
}

/// Trait defining the low-level interface for record stores.
///
/// This trait must be implemented by any backend that wants to persist
/// deployment records for the invoker system.
#[async_trait]
pub trait RecordStore: Send + Sync {
	/// Loads the current record, if any.
	async fn load(&self) -> Result<DeploymentRecord, StoreError>;

	/// Persists the record, replacing any previous one.
	async fn save(&self, record: &DeploymentRecord) -> Result<(), StoreError>;

	/// Discards the record. Succeeds when no record exists.
	async fn clear(&self) -> Result<(), StoreError>;

	/// Checks whether a record exists.
	async fn exists(&self) -> Result<bool, StoreError>;
}

/// High-level tracking service wrapping a record-store backend.
///
/// Adds the reuse-or-redeploy decision on top of the raw store: a recorded
/// deployment is only offered for reuse when it matches the requested chain
/// and redeployment was not forced.
pub struct TrackingService {
	/// The underlying record-store backend.
	backend: Box<dyn RecordStore>,
}

impl TrackingService {
	/// Creates a new TrackingService with the specified backend.
	pub fn new(backend: Box<dyn RecordStore>) -> Self {
		Self { backend }
	}

	/// Returns the remembered deployment for `chain_id`, unless `redeploy`
	/// forces fresh setup or the record is missing or for another chain.
	pub async fn reusable(&self, chain_id: u64, redeploy: bool) -> Option<DeploymentRecord> {
		if redeploy {
			return None;
		}

		match self.backend.load().await {
			Ok(record) if record.chain_id == chain_id => Some(record),
			Ok(record) => {
				tracing::debug!(
					recorded = record.chain_id,
					requested = chain_id,
					"Recorded deployment is for another chain"
				);
				None
			},
			Err(StoreError::NotFound) => None,
			Err(err) => {
				tracing::warn!("Failed to read deployment record: {}", err);
				None
			},
		}
	}

	/// Persists a freshly created deployment.
	pub async fn remember(&self, record: &DeploymentRecord) -> Result<(), StoreError> {
		self.backend.save(record).await
	}

	/// Drops any remembered deployment.
	pub async fn forget(&self) -> Result<(), StoreError> {
		self.backend.clear().await
	}
}

#[cfg(test)]
mod tests {
	use super::implementations::memory::MemoryStore;
	use super::*;

	fn record(chain_id: u64) -> DeploymentRecord {
		DeploymentRecord {
			chain_id,
			invoker: Address::repeat_byte(0xaa),
			mock: Address::repeat_byte(0xbb),
		}
	}

	#[tokio::test]
	async fn test_reusable_honors_redeploy_flag() {
		let service = TrackingService::new(Box::new(MemoryStore::new()));
		service.remember(&record(4056)).await.unwrap();

		assert_eq!(service.reusable(4056, false).await, Some(record(4056)));
		assert_eq!(service.reusable(4056, true).await, None);
	}

	#[tokio::test]
	async fn test_reusable_rejects_other_chain() {
		let service = TrackingService::new(Box::new(MemoryStore::new()));
		service.remember(&record(4056)).await.unwrap();

		assert_eq!(service.reusable(1, false).await, None);
	}

	#[tokio::test]
	async fn test_reusable_without_record() {
		let service = TrackingService::new(Box::new(MemoryStore::new()));
		assert_eq!(service.reusable(4056, false).await, None);
	}
}
