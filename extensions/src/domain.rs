use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Product identifier on the remote store
pub type ItemId = u64;

pub mod query {
    use super::ItemId;

    /// Ordered request-body mapping sent to the products API.
    /// Only the first pair takes part in cache key derivation.
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct Query {
        pairs: Vec<(String, String)>,
    }

    impl Query {
        pub fn new() -> Self {
            Self::default()
        }

        /// Default body for a single product lookup
        pub fn product(item_id: ItemId) -> Self {
            Self::new().with("product", item_id.to_string())
        }

        pub fn category(term_id: impl Into<String>) -> Self {
            Self::new().with("category", term_id)
        }

        pub fn tag(term_id: impl Into<String>) -> Self {
            Self::new().with("tag", term_id)
        }

        pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
            self.pairs.push((key.into(), value.into()));
            self
        }

        pub fn is_empty(&self) -> bool {
            self.pairs.is_empty()
        }

        pub fn first(&self) -> Option<(&str, &str)> {
            self.pairs
                .first()
                .map(|(key, value)| (key.as_str(), value.as_str()))
        }

        /// Option name of the per-query cache entry, built from the first pair
        pub fn option_name(&self) -> Option<String> {
            self.first()
                .map(|(key, value)| sanitize_key(&format!("edd_extension_{key}_{value}_data")))
        }
    }

    impl<K, V> FromIterator<(K, V)> for Query
    where
        K: Into<String>,
        V: Into<String>,
    {
        fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
            Self {
                pairs: iter
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            }
        }
    }

    /// Lowercases and strips everything outside `[a-z0-9_-]`
    pub fn sanitize_key(raw: &str) -> String {
        raw.chars()
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
            .collect()
    }
}

pub use query::{Query, sanitize_key};

/// Taxonomies a query can filter the catalog by
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Taxonomy {
    Category,
    Tag,
}

impl Taxonomy {
    pub fn from_query_key(key: &str) -> Option<Self> {
        match key {
            "category" => Some(Taxonomy::Category),
            "tag" => Some(Taxonomy::Tag),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomMeta {
    #[serde(default, deserialize_with = "loose_string")]
    pub basename: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub settings_tab: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub settings_section: Option<String>,
}

/// One product as returned by the remote catalog. Every field is optional
/// and tolerant of the loose typing the API produces.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default, deserialize_with = "loose_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "loose_terms")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "loose_terms")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "loose_meta")]
    pub custom_meta: Option<CustomMeta>,
}

impl CatalogItem {
    pub fn has_term(&self, taxonomy: Taxonomy, term_id: &str) -> bool {
        let terms = match taxonomy {
            Taxonomy::Category => &self.categories,
            Taxonomy::Tag => &self.tags,
        };
        terms.iter().any(|term| term == term_id)
    }
}

/// Full catalog keyed by item id
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Catalog(BTreeMap<String, CatalogItem>);

impl Catalog {
    pub fn get(&self, item_id: &str) -> Option<&CatalogItem> {
        self.0.get(item_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CatalogItem)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CatalogItem)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (K, CatalogItem)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, item)| (id.into(), item)).collect())
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // An empty catalog arrives as `[]`; list payloads are keyed by position.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Keyed(BTreeMap<String, Value>),
            Listed(Vec<Value>),
        }

        let entries: Vec<(String, Value)> = match Shape::deserialize(deserializer)? {
            Shape::Keyed(items) => items.into_iter().collect(),
            Shape::Listed(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, value)| (index.to_string(), value))
                .collect(),
        };

        Ok(entries.into_iter().filter_map(decode_item).collect())
    }
}

/// Items that are not objects are dropped, the rest of the catalog survives
fn decode_item((id, value): (String, Value)) -> Option<(String, CatalogItem)> {
    if !value.is_object() {
        debug!(item_id = %id, "Skipping catalog entry that is not an object");
        return None;
    }
    match serde_json::from_value(value) {
        Ok(item) => Some((id, item)),
        Err(e) => {
            debug!(item_id = %id, "Skipping undecodable catalog entry: {}", e);
            None
        }
    }
}

/// Normalized record used by the extension manager
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub basename: String,
    #[serde(default)]
    pub tab: String,
    #[serde(default)]
    pub section: String,
}

impl From<&CatalogItem> for ProductRecord {
    fn from(item: &CatalogItem) -> Self {
        let meta = item.custom_meta.as_ref();
        let or_empty = |field: Option<&String>| field.cloned().unwrap_or_default();

        Self {
            title: or_empty(item.title.as_ref()),
            slug: or_empty(item.slug.as_ref()),
            image: or_empty(item.image.as_ref()),
            description: or_empty(item.excerpt.as_ref()),
            basename: or_empty(meta.and_then(|m| m.basename.as_ref())),
            tab: or_empty(meta.and_then(|m| m.settings_tab.as_ref())),
            section: or_empty(meta.and_then(|m| m.settings_section.as_ref())),
        }
    }
}

/// Answer of a product data lookup
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProductData {
    Single { record: ProductRecord },
    Collection { records: BTreeMap<String, ProductRecord> },
    Unavailable,
}

impl ProductData {
    pub fn single(&self) -> Option<&ProductRecord> {
        match self {
            ProductData::Single { record } => Some(record),
            _ => None,
        }
    }

    pub fn into_single(self) -> Option<ProductRecord> {
        match self {
            ProductData::Single { record } => Some(record),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ProductData::Unavailable)
    }
}

pub mod options {
    use super::{Catalog, ProductRecord};
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    /// An option is fresh while it carries a non-zero timeout that has not passed
    pub fn is_fresh(timeout: Option<i64>, now: i64) -> bool {
        matches!(timeout, Some(timeout) if timeout != 0 && now <= timeout)
    }

    /// Per-query cache entry: a timeout beside item-id keyed records
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct QueryOption {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub timeout: Option<i64>,
        #[serde(flatten)]
        pub records: BTreeMap<String, ProductRecord>,
    }

    impl QueryOption {
        pub fn expiring_at(timeout: i64) -> Self {
            Self {
                timeout: Some(timeout),
                records: BTreeMap::new(),
            }
        }

        pub fn is_fresh(&self, now: i64) -> bool {
            is_fresh(self.timeout, now)
        }
    }

    /// Global snapshot of the whole catalog
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct CatalogOption {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub timeout: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub products: Option<Catalog>,
    }

    impl CatalogOption {
        pub fn is_fresh(&self, now: i64) -> bool {
            is_fresh(self.timeout, now)
        }
    }
}

fn loose_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn loose_terms<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let term = |value: Value| match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };

    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(values)) => values.into_iter().filter_map(term).collect(),
        Some(Value::Object(map)) => map.into_iter().filter_map(|(_, v)| term(v)).collect(),
        _ => Vec::new(),
    })
}

fn loose_meta<'de, D>(deserializer: D) -> std::result::Result<Option<CustomMeta>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}
