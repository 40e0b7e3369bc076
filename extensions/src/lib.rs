pub mod api;
pub mod domain;
pub mod persistence;
pub mod ports;
pub mod registry;

pub use api::{ExtensionsApi, HttpCatalogSource};
pub use domain::{Catalog, CatalogItem, ItemId, ProductData, ProductRecord, Query};
