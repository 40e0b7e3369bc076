use crate::ports::PluginInspector;
use shared::config::Config;
use std::collections::HashSet;

/// Plugin inspector fed from configuration lists
#[derive(Clone, Debug, Default)]
pub struct EnvironmentInspector {
    active_plugins: HashSet<String>,
    loaded_components: HashSet<String>,
}

impl EnvironmentInspector {
    pub fn new(
        active_plugins: impl IntoIterator<Item = String>,
        loaded_components: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            active_plugins: active_plugins.into_iter().collect(),
            loaded_components: loaded_components.into_iter().collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.active_plugins.iter().cloned(),
            config.loaded_components.iter().cloned(),
        )
    }
}

impl PluginInspector for EnvironmentInspector {
    fn is_plugin_active(&self, basename: &str) -> bool {
        self.active_plugins.contains(basename)
    }

    fn has_component(&self, name: &str) -> bool {
        self.loaded_components.contains(name)
    }
}
