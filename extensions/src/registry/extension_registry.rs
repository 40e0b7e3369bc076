use super::definition::{CardStyle, ExtensionDefinition, PassLevel};
use super::invoices;
use crate::api::ExtensionsApi;
use crate::domain::{ItemId, ProductRecord};
use crate::ports::PluginInspector;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// A settings section (key and label) on a settings tab
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    pub key: String,
    pub label: String,
}

impl Section {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// What the settings field renders for a promoted extension
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExtensionCard {
    pub item_id: ItemId,
    pub style: CardStyle,
    pub title: String,
    pub description: String,
    pub image: String,
    pub slug: String,
    pub basename: String,
    pub required_pass: PassLevel,
    pub pass_covers: bool,
    pub activated: bool,
    pub hide_submit: bool,
}

/// Registry of promoted extensions, replacing one settings adapter per extension
pub struct ExtensionRegistry {
    api: ExtensionsApi,
    inspector: Arc<dyn PluginInspector>,
    site_pass: Option<PassLevel>,
    definitions: Vec<ExtensionDefinition>,
}

impl ExtensionRegistry {
    pub fn new(
        api: ExtensionsApi,
        inspector: Arc<dyn PluginInspector>,
        site_pass: Option<PassLevel>,
    ) -> Self {
        Self {
            api,
            inspector,
            site_pass,
            definitions: Vec::new(),
        }
    }

    /// Registry preloaded with the built-in definitions
    pub fn with_builtins(
        api: ExtensionsApi,
        inspector: Arc<dyn PluginInspector>,
        site_pass: Option<PassLevel>,
    ) -> Self {
        let mut registry = Self::new(api, inspector, site_pass);
        registry.register(invoices::definition());
        registry
    }

    /// Adds a definition, replacing any previous one for the same item
    pub fn register(&mut self, definition: ExtensionDefinition) -> &mut Self {
        match self
            .definitions
            .iter_mut()
            .find(|d| d.item_id == definition.item_id)
        {
            Some(existing) => *existing = definition,
            None => self.definitions.push(definition),
        }
        self
    }

    pub fn definitions(&self) -> &[ExtensionDefinition] {
        &self.definitions
    }

    pub fn find(&self, tab: &str, section: &str) -> Option<&ExtensionDefinition> {
        self.definitions
            .iter()
            .find(|d| d.settings_tab == tab && d.settings_section == section)
    }

    async fn product(&self, definition: &ExtensionDefinition) -> Option<ProductRecord> {
        self.api
            .get_product_data(None, Some(definition.item_id))
            .await
            .into_single()
    }

    pub async fn is_activated(&self, definition: &ExtensionDefinition) -> bool {
        let product = self.product(definition).await;
        (definition.is_activated)(self.inspector.as_ref(), product.as_ref())
    }

    /// Appends the section of every extension on `tab` that is not activated yet.
    /// Outside the settings screen the sections are returned untouched.
    pub async fn sections(
        &self,
        tab: &str,
        mut sections: Vec<Section>,
        is_settings_screen: bool,
    ) -> Vec<Section> {
        if !is_settings_screen {
            return sections;
        }

        for definition in self.definitions.iter().filter(|d| d.settings_tab == tab) {
            if sections.iter().any(|s| s.key == definition.settings_section) {
                continue;
            }
            if self.is_activated(definition).await {
                debug!(item_id = definition.item_id, "Extension already active, no section");
                continue;
            }
            sections.push(Section::new(
                definition.settings_section.clone(),
                definition.section_label.clone(),
            ));
        }

        sections
    }

    /// Card for the extension promoted on a settings section
    pub async fn card(&self, tab: &str, section: &str) -> Option<ExtensionCard> {
        let definition = self.find(tab, section)?;
        let product = self.product(definition).await;
        let activated = (definition.is_activated)(self.inspector.as_ref(), product.as_ref());
        let product = product.unwrap_or_default();
        let configuration = (definition.configuration)(&product);

        Some(ExtensionCard {
            item_id: definition.item_id,
            style: configuration.style,
            title: configuration.title.unwrap_or(product.title),
            description: configuration.description.unwrap_or(product.description),
            image: product.image,
            slug: product.slug,
            basename: product.basename,
            required_pass: definition.pass_level,
            pass_covers: self
                .site_pass
                .is_some_and(|pass| pass.covers(definition.pass_level)),
            activated,
            hide_submit: !activated,
        })
    }
}

impl std::fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("site_pass", &self.site_pass)
            .field("definitions", &self.definitions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Catalog, CatalogItem, CustomMeta};
    use crate::persistence::MokaOptionStore;
    use crate::ports::CatalogSource;
    use crate::registry::{Configuration, EnvironmentInspector};
    use async_trait::async_trait;
    use shared::Result;

    const BASENAME: &str = "edd-invoices/edd-invoices.php";

    struct StaticSource;

    #[async_trait]
    impl CatalogSource for StaticSource {
        async fn fetch_catalog(&self) -> Result<Catalog> {
            Ok([(
                "375153",
                CatalogItem {
                    title: Some("Invoices".to_string()),
                    slug: Some("edd-invoices".to_string()),
                    image: Some("https://example.com/invoices.png".to_string()),
                    custom_meta: Some(CustomMeta {
                        basename: Some(BASENAME.to_string()),
                        settings_tab: Some("gateways".to_string()),
                        settings_section: Some("invoices".to_string()),
                    }),
                    ..Default::default()
                },
            )]
            .into_iter()
            .collect())
        }
    }

    fn registry(inspector: EnvironmentInspector, pass: Option<PassLevel>) -> ExtensionRegistry {
        let api = ExtensionsApi::new(Arc::new(MokaOptionStore::default()), Arc::new(StaticSource));
        ExtensionRegistry::with_builtins(api, Arc::new(inspector), pass)
    }

    #[tokio::test]
    async fn test_sections_adds_inactive_extension() {
        let registry = registry(EnvironmentInspector::default(), None);

        let sections = registry
            .sections("gateways", vec![Section::new("main", "General")], true)
            .await;

        assert_eq!(
            sections,
            vec![Section::new("main", "General"), Section::new("invoices", "Invoices")]
        );
    }

    #[tokio::test]
    async fn test_sections_skips_active_extension() {
        let inspector = EnvironmentInspector::new(vec![BASENAME.to_string()], vec![]);
        let registry = registry(inspector, None);

        let sections = registry.sections("gateways", Vec::new(), true).await;

        assert!(sections.is_empty());
    }

    #[tokio::test]
    async fn test_sections_untouched_outside_settings_screen_or_tab() {
        let registry = registry(EnvironmentInspector::default(), None);

        assert!(registry.sections("gateways", Vec::new(), false).await.is_empty());
        assert!(registry.sections("emails", Vec::new(), true).await.is_empty());
    }

    #[tokio::test]
    async fn test_card_merges_product_and_configuration() {
        let registry = registry(EnvironmentInspector::default(), Some(PassLevel::Professional));

        let card = registry.card("gateways", "invoices").await.unwrap();

        assert_eq!(card.item_id, 375153);
        assert_eq!(card.style, CardStyle::Horizontal);
        assert_eq!(card.title, "Impress Your Customers with Custom Invoices");
        assert_eq!(card.image, "https://example.com/invoices.png");
        assert_eq!(card.basename, BASENAME);
        assert_eq!(card.required_pass, PassLevel::Extended);
        assert!(card.pass_covers);
        assert!(!card.activated);
        assert!(card.hide_submit);
    }

    #[tokio::test]
    async fn test_card_without_pass_or_registration() {
        let registry = registry(EnvironmentInspector::default(), Some(PassLevel::Personal));

        let card = registry.card("gateways", "invoices").await.unwrap();
        assert!(!card.pass_covers);

        assert!(registry.card("gateways", "stripe").await.is_none());
    }

    #[tokio::test]
    async fn test_register_replaces_same_item() {
        let mut registry = registry(EnvironmentInspector::default(), None);
        let mut replacement = invoices::definition();
        replacement.settings_tab = "emails".to_string();
        replacement.configuration = |_| Configuration::default();

        registry.register(replacement);

        assert_eq!(registry.definitions().len(), 1);
        assert!(registry.find("gateways", "invoices").is_none());
        let card = registry.card("emails", "invoices").await.unwrap();
        assert_eq!(card.title, "Invoices");
        assert_eq!(card.style, CardStyle::Vertical);
    }
}
