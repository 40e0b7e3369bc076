// Public API
pub mod definition;
pub mod extension_registry;
pub mod inspector;
pub mod invoices;

// Re-export commonly used types
pub use definition::{CardStyle, Configuration, ExtensionDefinition, PassLevel};
pub use extension_registry::{ExtensionCard, ExtensionRegistry, Section};
pub use inspector::EnvironmentInspector;
