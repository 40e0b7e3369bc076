use crate::domain::options::{CatalogOption, QueryOption};
use crate::domain::{Catalog, ItemId, ProductData, ProductRecord, Query, Taxonomy};
use crate::ports::{CatalogSource, OptionStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{HOUR_IN_SECONDS, WEEK_IN_SECONDS, now_timestamp};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Option holding the snapshot of the whole catalog
pub const ALL_EXTENSION_DATA_OPTION: &str = "edd_all_extension_data";

const QUERY_TTL_SECS: i64 = WEEK_IN_SECONDS;
const CATALOG_TTL_SECS: i64 = 4 * HOUR_IN_SECONDS;
const BACKOFF_SECS: i64 = HOUR_IN_SECONDS;

/// Read-through cache in front of the remote products API.
///
/// Per-query entries live for a week, the catalog snapshot for four hours.
/// When the remote call fails, both are rewritten with a one hour timeout so
/// the next attempt waits instead of hammering the API, and whatever stale
/// data is still around is served in the meantime.
#[derive(Clone)]
pub struct ExtensionsApi {
    store: Arc<dyn OptionStore>,
    source: Arc<dyn CatalogSource>,
}

impl ExtensionsApi {
    pub fn new(store: Arc<dyn OptionStore>, source: Arc<dyn CatalogSource>) -> Self {
        Self { store, source }
    }

    /// Gets the product data for a query, or for a single item.
    ///
    /// Without a query the default `product=<item_id>` body is used; with
    /// neither the lookup is `Unavailable` and nothing is touched.
    pub async fn get_product_data(&self, query: Option<&Query>, item_id: Option<ItemId>) -> ProductData {
        let item_id = item_id.filter(|id| *id != 0);
        let query = match (query.filter(|q| !q.is_empty()), item_id) {
            (Some(query), _) => query.clone(),
            (None, Some(id)) => Query::product(id),
            (None, None) => return ProductData::Unavailable,
        };
        let (Some((key, term)), Some(option_name)) = (query.first(), query.option_name()) else {
            return ProductData::Unavailable;
        };

        let item_key = item_id.map(|id| id.to_string());
        let option = self.read_option::<QueryOption>(&option_name).await;
        let now = now_timestamp();

        if let Some(fresh) = option.as_ref().filter(|o| o.is_fresh(now)) {
            debug!(option = %option_name, "Serving fresh product data");
            return pick(fresh.clone(), item_key.as_deref());
        }

        let catalog = match self.fetch_all_products().await {
            Some(catalog) if !catalog.is_empty() => catalog,
            _ => {
                // Keep whatever the stale entry had, but wait an hour before asking again.
                let mut placeholder = option.clone().unwrap_or_default();
                placeholder.timeout = Some(now + BACKOFF_SECS);
                self.write_option(&option_name, &placeholder).await;
                warn!(option = %option_name, "No product data available, backing off for an hour");

                return match option {
                    Some(stale) => pick(stale, item_key.as_deref()),
                    None => ProductData::Unavailable,
                };
            }
        };

        let mut value = QueryOption::expiring_at(now + QUERY_TTL_SECS);
        match item_key.as_deref().and_then(|id| catalog.get(id).map(|item| (id, item))) {
            Some((id, item)) => {
                value.records.insert(id.to_string(), ProductRecord::from(item));
            }
            None => {
                if let Some(taxonomy) = Taxonomy::from_query_key(key) {
                    value.records.extend(
                        catalog
                            .iter()
                            .filter(|(_, item)| item.has_term(taxonomy, term))
                            .map(|(id, item)| (id.clone(), ProductRecord::from(item))),
                    );
                }
            }
        }

        self.write_option(&option_name, &value).await;
        info!(
            option = %option_name,
            records = value.records.len(),
            "Refreshed product data"
        );

        pick(value, item_key.as_deref())
    }

    /// Gets the whole catalog, from the snapshot option while it is fresh or
    /// from a single remote request otherwise. `None` signals a failure.
    async fn fetch_all_products(&self) -> Option<Catalog> {
        let now = now_timestamp();
        if let Some(cached) = self.read_option::<CatalogOption>(ALL_EXTENSION_DATA_OPTION).await {
            if cached.is_fresh(now) {
                debug!("Serving catalog snapshot");
                return cached.products.filter(|products| !products.is_empty());
            }
        }

        match self.source.fetch_catalog().await {
            Ok(catalog) => {
                info!(products = catalog.len(), "Fetched catalog from the products API");
                let snapshot = CatalogOption {
                    timeout: Some(now + CATALOG_TTL_SECS),
                    products: Some(catalog.clone()),
                };
                self.write_option(ALL_EXTENSION_DATA_OPTION, &snapshot).await;
                Some(catalog)
            }
            Err(e) => {
                warn!("Products API request failed: {}", e);
                let placeholder = CatalogOption {
                    timeout: Some(now + BACKOFF_SECS),
                    products: None,
                };
                self.write_option(ALL_EXTENSION_DATA_OPTION, &placeholder).await;
                None
            }
        }
    }

    async fn read_option<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        match self.store.get(name).await {
            Ok(Some(value)) => serde_json::from_value(value)
                .map_err(|e| warn!(option = %name, "Ignoring malformed option: {}", e))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(option = %name, "Failed to read option: {}", e);
                None
            }
        }
    }

    async fn write_option<T: Serialize>(&self, name: &str, value: &T) {
        let result = match serde_json::to_value(value) {
            Ok(value) => self.store.set(name, value).await,
            Err(e) => Err(shared::Error::Serialization(e.to_string())),
        };
        if let Err(e) = result {
            warn!(option = %name, "Failed to write option: {}", e);
        }
    }
}

impl std::fmt::Debug for ExtensionsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionsApi").finish_non_exhaustive()
    }
}

/// The requested item's record when present, else every record of the entry
fn pick(mut option: QueryOption, item_key: Option<&str>) -> ProductData {
    match item_key.and_then(|id| option.records.remove(id)) {
        Some(record) => ProductData::Single { record },
        None => ProductData::Collection {
            records: option.records,
        },
    }
}
