//! File-based storage backend implementation.
//!
//! Each key is stored in its own file under a base directory. Files carry a
//! small header recording the format version; files written before the header
//! existed are still read as raw payloads.

use crate::{StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use bill_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError,
};
use std::path::PathBuf;
use tokio::fs;

#[allow(clippy::doc_nested_refdefs)]
/// Fixed-size file header carrying the storage format version.
///
/// Binary layout (16 bytes total):
/// - [0-3]: Magic bytes "BILL"
/// - [4-5]: Version (u16, little-endian)
/// - [6-15]: Reserved/padding for future use
#[derive(Debug, Clone)]
struct FileHeader {
	magic: [u8; 4],
	version: u16,
	padding: [u8; 10],
}

impl FileHeader {
	const MAGIC: &'static [u8; 4] = b"BILL";
	const VERSION: u16 = 1;
	const SIZE: usize = 16;

	fn new() -> Self {
		Self {
			magic: *Self::MAGIC,
			version: Self::VERSION,
			padding: [0; 10],
		}
	}

	/// Serializes the header to bytes.
	fn serialize(&self) -> [u8; Self::SIZE] {
		let mut bytes = [0u8; Self::SIZE];
		bytes[0..4].copy_from_slice(&self.magic);
		bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
		bytes[6..16].copy_from_slice(&self.padding);
		bytes
	}

	/// Deserializes a header from the start of a file.
	///
	/// Returns `Ok(None)` for files without a header (unversioned format).
	fn deserialize(bytes: &[u8]) -> Result<Option<Self>, StorageError> {
		if bytes.len() < Self::SIZE || &bytes[0..4] != Self::MAGIC {
			return Ok(None);
		}

		let version = u16::from_le_bytes([bytes[4], bytes[5]]);
		if version > Self::VERSION {
			return Err(StorageError::Backend(format!(
				"Unsupported file version: {}",
				version
			)));
		}

		let mut magic = [0u8; 4];
		magic.copy_from_slice(&bytes[0..4]);
		let mut padding = [0u8; 10];
		padding.copy_from_slice(&bytes[6..16]);

		Ok(Some(Self {
			magic,
			version,
			padding,
		}))
	}
}

/// File-based storage implementation.
///
/// This implementation stores each value in its own file,
/// providing simple persistence without requiring external services.
pub struct FileStorage {
	/// Base directory path for storing files.
	base_path: PathBuf,
	/// Whether new files are written with a version header.
	versioned: bool,
}

impl FileStorage {
	/// Creates a new FileStorage instance with the specified base path.
	pub fn new(base_path: PathBuf, versioned: bool) -> Self {
		Self {
			base_path,
			versioned,
		}
	}

	/// Converts a storage key to a filesystem-safe file path.
	///
	/// Sanitizes the key by replacing problematic characters and
	/// appending a .bin extension.
	fn get_file_path(&self, key: &str) -> PathBuf {
		let safe_key = key.replace(['/', '\\', ':'], "_");
		self.base_path.join(format!("{}.bin", safe_key))
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.get_file_path(key);

		let data = match fs::read(&path).await {
			Ok(data) => data,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(StorageError::NotFound)
			},
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		match FileHeader::deserialize(&data)? {
			Some(_) => Ok(data[FileHeader::SIZE..].to_vec()),
			None => {
				tracing::debug!(key, "Reading unversioned file");
				Ok(data)
			},
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		let file_data = if self.versioned {
			let mut file_data = Vec::with_capacity(FileHeader::SIZE + value.len());
			file_data.extend_from_slice(&FileHeader::new().serialize());
			file_data.extend_from_slice(&value);
			file_data
		} else {
			value
		};

		// Write atomically by writing to temp file then renaming
		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, file_data)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		Ok(())
	}

}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![], // No required fields
			vec![
				Field::new("storage_path", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(path) if !path.trim().is_empty() => Ok(()),
						_ => Err("storage_path cannot be empty".to_string()),
					}
				}),
				Field::new("versioned", FieldType::Boolean),
			],
		);

		schema.validate(config)
	}
}

/// Factory function to create a storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for file storage (default: "./data/storage")
/// - `versioned`: Write the version header on new files (default: true)
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	FileStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or("./data/storage")
		.to_string();

	let versioned = config
		.get("versioned")
		.and_then(|v| v.as_bool())
		.unwrap_or(true);

	Ok(Box::new(FileStorage::new(
		PathBuf::from(storage_path),
		versioned,
	)))
}

/// Registry for the file storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[tokio::test]
	async fn test_round_trip_with_header() {
		let temp_dir = TempDir::new().unwrap();
		let storage = FileStorage::new(temp_dir.path().to_path_buf(), true);

		storage
			.set_bytes("foodItems", b"[{\"id\":\"a\"}]".to_vec())
			.await
			.unwrap();

		let raw = std::fs::read(temp_dir.path().join("foodItems.bin")).unwrap();
		assert_eq!(&raw[0..4], b"BILL");
		assert_eq!(raw.len(), FileHeader::SIZE + 12);

		let value = storage.get_bytes("foodItems").await.unwrap();
		assert_eq!(value, b"[{\"id\":\"a\"}]".to_vec());
		assert!(!temp_dir.path().join("foodItems.tmp").exists());
	}

	#[tokio::test]
	async fn test_reads_unversioned_file() {
		let temp_dir = TempDir::new().unwrap();
		std::fs::write(temp_dir.path().join("orders.bin"), b"[]").unwrap();

		let storage = FileStorage::new(temp_dir.path().to_path_buf(), true);
		assert_eq!(storage.get_bytes("orders").await.unwrap(), b"[]".to_vec());
	}

	#[tokio::test]
	async fn test_unversioned_writes_raw_payload() {
		let temp_dir = TempDir::new().unwrap();
		let storage = FileStorage::new(temp_dir.path().to_path_buf(), false);

		storage.set_bytes("orders", b"[]".to_vec()).await.unwrap();
		let raw = std::fs::read(temp_dir.path().join("orders.bin")).unwrap();
		assert_eq!(raw, b"[]".to_vec());
	}

	#[tokio::test]
	async fn test_rejects_newer_version() {
		let temp_dir = TempDir::new().unwrap();
		let mut data = FileHeader::new().serialize().to_vec();
		data[4..6].copy_from_slice(&(FileHeader::VERSION + 1).to_le_bytes());
		data.extend_from_slice(b"[]");
		std::fs::write(temp_dir.path().join("orders.bin"), data).unwrap();

		let storage = FileStorage::new(temp_dir.path().to_path_buf(), true);
		let result = storage.get_bytes("orders").await;
		assert!(matches!(result, Err(StorageError::Backend(msg)) if msg.contains("version")));
	}

	#[tokio::test]
	async fn test_missing_key_and_nested_directory() {
		let temp_dir = TempDir::new().unwrap();
		let storage = FileStorage::new(temp_dir.path().join("nested"), true);

		assert!(matches!(
			storage.get_bytes("orders").await,
			Err(StorageError::NotFound)
		));

		storage.set_bytes("orders", b"[]".to_vec()).await.unwrap();
		assert!(temp_dir.path().join("nested").join("orders.bin").exists());
		assert_eq!(storage.get_bytes("orders").await.unwrap(), b"[]".to_vec());
	}

	#[tokio::test]
	async fn test_write_fails_when_base_path_is_a_file() {
		let temp_dir = TempDir::new().unwrap();
		let blocker = temp_dir.path().join("blocker");
		std::fs::write(&blocker, b"").unwrap();

		let storage = FileStorage::new(blocker, true);
		let result = storage.set_bytes("orders", b"[]".to_vec()).await;
		assert!(matches!(result, Err(StorageError::Backend(_))));
	}

	#[test]
	fn test_factory_validates_config() {
		let config: toml::Value = toml::from_str("storage_path = \"\"").unwrap();
		assert!(matches!(
			create_storage(&config),
			Err(StorageError::Configuration(_))
		));

		let config: toml::Value =
			toml::from_str("storage_path = \"./tmp\"\nversioned = false").unwrap();
		assert!(create_storage(&config).is_ok());
	}
}
