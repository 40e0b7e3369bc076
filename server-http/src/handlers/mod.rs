pub mod health;
pub mod products;
pub mod settings;

pub use health::health_check;
pub use products::{get_product, query_products};
pub use settings::{get_card, list_sections};
