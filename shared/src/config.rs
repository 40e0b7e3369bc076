use tracing::warn;

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub products_url: String,
    pub request_timeout_secs: u64,
    pub active_plugins: Vec<String>,
    pub loaded_components: Vec<String>,
    pub pass_level: Option<String>,
}

impl Config {
    pub const DEFAULT_PRODUCTS_URL: &'static str = "https://easydigitaldownloads.com/";
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    const DEFAULT_DATA_DIR: &'static str = "./data";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("EDD_HTTP_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            http_port: parse_or(&lookup, "EDD_HTTP_PORT", Self::DEFAULT_HTTP_PORT),
            data_dir: lookup("EDD_DATA_DIR").unwrap_or_else(|| Self::DEFAULT_DATA_DIR.to_string()),
            products_url: lookup("EDD_PRODUCTS_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| Self::DEFAULT_PRODUCTS_URL.to_string()),
            request_timeout_secs: parse_or(
                &lookup,
                "EDD_REQUEST_TIMEOUT_SECS",
                Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            active_plugins: split_list(lookup("EDD_ACTIVE_PLUGINS")),
            loaded_components: split_list(lookup("EDD_LOADED_COMPONENTS")),
            pass_level: lookup("EDD_PASS_LEVEL").filter(|level| !level.trim().is_empty()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", name, raw, default);
            default
        }),
        None => default,
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[]));

        assert_eq!(config.products_url, "https://easydigitaldownloads.com/");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert!(config.active_plugins.is_empty());
        assert!(config.pass_level.is_none());
    }

    #[test]
    fn test_products_url_override() {
        let config = Config::from_lookup(lookup_from(&[(
            "EDD_PRODUCTS_URL",
            "http://localhost:9000/",
        )]));

        assert_eq!(config.products_url, "http://localhost:9000/");
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("EDD_HTTP_PORT", "eighty")]));

        assert_eq!(config.http_port, 8080);
    }

    #[test]
    fn test_lists_are_trimmed() {
        let config = Config::from_lookup(lookup_from(&[
            ("EDD_ACTIVE_PLUGINS", " edd-invoices/edd-invoices.php , ,other/other.php"),
            ("EDD_LOADED_COMPONENTS", "EDDInvoices"),
        ]));

        assert_eq!(
            config.active_plugins,
            vec!["edd-invoices/edd-invoices.php", "other/other.php"]
        );
        assert_eq!(config.loaded_components, vec!["EDDInvoices"]);
    }
}
