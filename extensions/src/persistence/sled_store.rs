use crate::ports::OptionStore;
use async_trait::async_trait;
use serde_json::Value;
use shared::{Error, Result};
use std::path::Path;

const OPTIONS_TREE: &str = "options";

/// Sled-backed option store, surviving restarts
#[derive(Clone)]
pub struct SledOptionStore {
    db: sled::Db,
}

impl SledOptionStore {
    /// Create a new Sled option store
    /// Creates the parent directory if it doesn't exist
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create directory: {}", e)))?;
        }

        let db = sled::open(path)
            .map_err(|e| Error::Storage(format!("Failed to open Sled database: {}", e)))?;

        Ok(Self { db })
    }

    fn options_tree(&self) -> Result<sled::Tree> {
        self.db
            .open_tree(OPTIONS_TREE)
            .map_err(|e| Error::Storage(format!("Failed to open options tree: {}", e)))
    }
}

#[async_trait]
impl OptionStore for SledOptionStore {
    async fn get(&self, name: &str) -> Result<Option<Value>> {
        let value = self
            .options_tree()?
            .get(name.as_bytes())
            .map_err(|e| Error::Storage(format!("Failed to get option: {}", e)))?;

        match value {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    Error::Serialization(format!("Failed to deserialize option: {}", e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, name: &str, value: Value) -> Result<()> {
        let bytes = serde_json::to_vec(&value)
            .map_err(|e| Error::Serialization(format!("Failed to serialize option: {}", e)))?;

        self.options_tree()?
            .insert(name.as_bytes(), bytes)
            .map_err(|e| Error::Storage(format!("Failed to save option: {}", e)))?;

        self.db
            .flush_async()
            .await
            .map_err(|e| Error::Storage(format!("Failed to flush database: {}", e)))?;

        Ok(())
    }
}
