use crate::ports::OptionStore;
use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;
use shared::Result;

/// Moka-based in-memory option store.
/// Entries never expire on their own; freshness is judged from their `timeout` field.
pub struct MokaOptionStore {
    options: Cache<String, Value>,
}

impl MokaOptionStore {
    /// Create a new option store, optionally bounded to `max_options` entries
    pub fn new(max_options: Option<u64>) -> Self {
        let mut builder = Cache::builder().name("options");

        if let Some(capacity) = max_options {
            builder = builder.max_capacity(capacity);
        }

        Self {
            options: builder.build(),
        }
    }
}

impl Default for MokaOptionStore {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl OptionStore for MokaOptionStore {
    async fn get(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.options.get(name).await)
    }

    async fn set(&self, name: &str, value: Value) -> Result<()> {
        self.options.insert(name.to_string(), value).await;
        Ok(())
    }
}

impl std::fmt::Debug for MokaOptionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaOptionStore")
            .field("entry_count", &self.options.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_moka_option_store_set_and_get() {
        let store = MokaOptionStore::default();

        store
            .set("edd_extension_product_1_data", json!({ "timeout": 10 }))
            .await
            .unwrap();

        let fetched = store.get("edd_extension_product_1_data").await.unwrap();
        assert_eq!(fetched, Some(json!({ "timeout": 10 })));
    }

    #[tokio::test]
    async fn test_moka_option_store_get_nonexistent() {
        let store = MokaOptionStore::new(Some(16));

        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_moka_option_store_overwrite() {
        let store = MokaOptionStore::default();

        store.set("option", json!(1)).await.unwrap();
        store.set("option", json!(2)).await.unwrap();

        assert_eq!(store.get("option").await.unwrap(), Some(json!(2)));
    }
}
