pub mod moka_store;
pub mod sled_store;

pub use moka_store::MokaOptionStore;
pub use sled_store::SledOptionStore;
