use super::definition::{CardStyle, Configuration, ExtensionDefinition, PassLevel, plugin_is_active};
use crate::domain::ProductRecord;
use crate::ports::PluginInspector;

pub const ITEM_ID: u64 = 375153;
const COMPONENT: &str = "EDDInvoices";

/// Invoices, promoted on the payment gateways tab
pub fn definition() -> ExtensionDefinition {
    ExtensionDefinition {
        item_id: ITEM_ID,
        settings_tab: "gateways".to_string(),
        settings_section: "invoices".to_string(),
        section_label: "Invoices".to_string(),
        pass_level: PassLevel::Extended,
        configuration,
        is_activated,
    }
}

fn configuration(_product: &ProductRecord) -> Configuration {
    Configuration {
        style: CardStyle::Horizontal,
        title: Some("Impress Your Customers with Custom Invoices".to_string()),
        description: Some(
            "Allow your customers to download beautiful, professional invoices with one click!"
                .to_string(),
        ),
    }
}

fn is_activated(inspector: &dyn PluginInspector, product: Option<&ProductRecord>) -> bool {
    plugin_is_active(inspector, product) || inspector.has_component(COMPONENT)
}
