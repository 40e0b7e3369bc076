pub mod extensions_api;
pub mod remote;

pub use extensions_api::{ALL_EXTENSION_DATA_OPTION, ExtensionsApi};
pub use remote::HttpCatalogSource;
