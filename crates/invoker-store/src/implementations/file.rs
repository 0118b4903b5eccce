//! File-backed record store for the invoker system.
//!
//! Persists the deployment record as `record.json` under a base directory,
//! mirroring how test runs hand their instances to the next run.

use crate::{DeploymentRecord, RecordStore, StoreError};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// Name of the record file inside the base directory.
const RECORD_FILE: &str = "record.json";

/// File-based record store implementation.
///
/// Stores the record as JSON on the filesystem, providing simple persistence
/// across process runs without external dependencies.
pub struct FileStore {
	/// Base directory the record file lives in.
	base_dir: PathBuf,
}

impl FileStore {
	/// Creates a new FileStore rooted at `base_dir`.
	///
	/// The directory is created lazily on the first save.
	pub fn new(base_dir: impl Into<PathBuf>) -> Self {
		Self {
			base_dir: base_dir.into(),
		}
	}

	fn record_path(&self) -> PathBuf {
		self.base_dir.join(RECORD_FILE)
	}
}

#[async_trait]
impl RecordStore for FileStore {
	async fn load(&self) -> Result<DeploymentRecord, StoreError> {
		let bytes = match fs::read(self.record_path()).await {
			Ok(bytes) => bytes,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				return Err(StoreError::NotFound)
			},
			Err(err) => return Err(StoreError::Backend(err.to_string())),
		};

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))
	}

	async fn save(&self, record: &DeploymentRecord) -> Result<(), StoreError> {
		fs::create_dir_all(&self.base_dir)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))?;

		let bytes =
			serde_json::to_vec(record).map_err(|e| StoreError::Serialization(e.to_string()))?;

		fs::write(self.record_path(), bytes)
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))
	}

	async fn clear(&self) -> Result<(), StoreError> {
		match fs::remove_file(self.record_path()).await {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(err) => Err(StoreError::Backend(err.to_string())),
		}
	}

	async fn exists(&self) -> Result<bool, StoreError> {
		fs::try_exists(self.record_path())
			.await
			.map_err(|e| StoreError::Backend(e.to_string()))
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
	async fn test_roundtrip() {
		let dir = tempfile::tempdir().unwrap();
		let store = FileStore::new(dir.path());

		assert!(matches!(store.load().await, Err(StoreError::NotFound)));

		store.save(&record()).await.unwrap();
		assert!(store.exists().await.unwrap());
		assert_eq!(store.load().await.unwrap(), record());
	}

	#[tokio::test]
	async fn test_clear_is_idempotent() {
		let dir = tempfile::tempdir().unwrap();
		let store = FileStore::new(dir.path());

		store.save(&record()).await.unwrap();
		store.clear().await.unwrap();
		store.clear().await.unwrap();

		assert!(!store.exists().await.unwrap());
	}

	#[tokio::test]
	async fn test_corrupt_record_reports_serialization() {
		let dir = tempfile::tempdir().unwrap();
		let store = FileStore::new(dir.path());

		fs::write(dir.path().join(RECORD_FILE), b"not json")
			.await
			.unwrap();

		assert!(matches!(
			store.load().await,
			Err(StoreError::Serialization(_))
		));
	}
}
