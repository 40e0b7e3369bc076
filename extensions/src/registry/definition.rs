use crate::domain::{ItemId, ProductRecord};
use crate::ports::PluginInspector;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Pass tiers, ordered from the smallest to the most inclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassLevel {
    Personal,
    Extended,
    Professional,
    AllAccess,
}

impl PassLevel {
    pub fn covers(self, required: PassLevel) -> bool {
        self >= required
    }
}

impl FromStr for PassLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "personal" => Ok(PassLevel::Personal),
            "extended" => Ok(PassLevel::Extended),
            "professional" => Ok(PassLevel::Professional),
            "all_access" => Ok(PassLevel::AllAccess),
            other => Err(format!("Invalid pass level '{}'", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardStyle {
    #[default]
    Vertical,
    Horizontal,
}

/// Presentation overrides for an extension's settings card
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub style: CardStyle,
    pub title: Option<String>,
    pub description: Option<String>,
}

pub type ConfigurationFn = fn(&ProductRecord) -> Configuration;
pub type ActivationFn = fn(&dyn PluginInspector, Option<&ProductRecord>) -> bool;

/// Everything the settings screens need to promote one extension
#[derive(Clone, Debug)]
pub struct ExtensionDefinition {
    pub item_id: ItemId,
    pub settings_tab: String,
    pub settings_section: String,
    pub section_label: String,
    pub pass_level: PassLevel,
    pub configuration: ConfigurationFn,
    pub is_activated: ActivationFn,
}

/// Activation check shared by most extensions: their plugin basename is active
pub fn plugin_is_active(inspector: &dyn PluginInspector, product: Option<&ProductRecord>) -> bool {
    product
        .map(|p| !p.basename.is_empty() && inspector.is_plugin_active(&p.basename))
        .unwrap_or(false)
}
