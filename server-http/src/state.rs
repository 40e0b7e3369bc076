use extensions::persistence::{MokaOptionStore, SledOptionStore};
use extensions::ports::OptionStore;
use extensions::registry::{EnvironmentInspector, ExtensionRegistry, PassLevel};
use extensions::{ExtensionsApi, HttpCatalogSource};
use shared::config::Config;
use std::sync::Arc;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub extensions_api: ExtensionsApi,
    pub registry: Arc<ExtensionRegistry>,
}

impl AppState {
    pub fn new(extensions_api: ExtensionsApi, registry: ExtensionRegistry) -> Self {
        Self {
            extensions_api,
            registry: Arc::new(registry),
        }
    }

    pub fn from_config(config: &Config) -> shared::Result<Self> {
        // Try to persist options on disk, fall back to in-memory if it fails
        let store: Arc<dyn OptionStore> = match Self::init_option_store(config) {
            Ok(store) => {
                tracing::info!("Option store opened at {}", config.data_dir);
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!("Failed to open option store: {}. Running in-memory mode.", e);
                Arc::new(MokaOptionStore::default())
            }
        };

        let source = Arc::new(HttpCatalogSource::from_config(config)?);
        tracing::info!("Products API: {}", source.base_url());

        let site_pass = config.pass_level.as_deref().and_then(|level| {
            level
                .parse::<PassLevel>()
                .map_err(|e| tracing::warn!("Ignoring EDD_PASS_LEVEL: {}", e))
                .ok()
        });

        let extensions_api = ExtensionsApi::new(store, source);
        let registry = ExtensionRegistry::with_builtins(
            extensions_api.clone(),
            Arc::new(EnvironmentInspector::from_config(config)),
            site_pass,
        );

        Ok(Self::new(extensions_api, registry))
    }

    fn init_option_store(config: &Config) -> shared::Result<SledOptionStore> {
        let path = std::path::Path::new(&config.data_dir).join("options.sled");
        SledOptionStore::new(path)
    }
}
