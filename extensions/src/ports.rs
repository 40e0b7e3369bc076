#![deny(clippy::all)]

use crate::domain::Catalog;
use async_trait::async_trait;
use serde_json::Value;
use shared::Result;

// Ports are the pluggable seams between the catalog cache and its surroundings

/// Port for the persistent option store holding cache entries.
/// Values are JSON documents; expiry is decided by the reader.
#[async_trait]
pub trait OptionStore: Send + Sync + 'static {
    async fn get(&self, name: &str) -> Result<Option<Value>>;
    async fn set(&self, name: &str, value: Value) -> Result<()>;
}

/// Port for the remote products API
#[async_trait]
pub trait CatalogSource: Send + Sync + 'static {
    /// Fetch the whole catalog in a single request
    async fn fetch_catalog(&self) -> Result<Catalog>;
}

/// Port answering whether an add-on is present on the site
pub trait PluginInspector: Send + Sync + 'static {
    fn is_plugin_active(&self, basename: &str) -> bool;
    fn has_component(&self, name: &str) -> bool;
}
