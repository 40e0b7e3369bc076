use crate::domain::Catalog;
use crate::ports::CatalogSource;
use async_trait::async_trait;
use reqwest::StatusCode;
use shared::config::Config;
use shared::{Error, Result};
use std::time::Duration;
use tracing::debug;

/// Products API client. TLS certificates are always verified.
#[derive(Clone, Debug)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogSource {
    pub const ACTION: &'static str = "extension_data";

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.products_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_catalog(&self) -> Result<Catalog> {
        debug!("GET {} (edd_action={})", self.base_url, Self::ACTION);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("edd_action", Self::ACTION)])
            .send()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Remote(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn source_for(server: &MockServer) -> HttpCatalogSource {
        HttpCatalogSource::new(format!("{}/", server.uri()), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_catalog_decodes_keyed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("edd_action", "extension_data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "375153": {
                    "title": "Invoices",
                    "categories": [45],
                    "custom_meta": { "settings_tab": "gateways" }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = source_for(&server).await.fetch_catalog().await.unwrap();

        let item = catalog.get("375153").unwrap();
        assert_eq!(item.title.as_deref(), Some("Invoices"));
        assert_eq!(item.categories, vec!["45"]);
        assert_eq!(
            item.custom_meta.as_ref().unwrap().settings_tab.as_deref(),
            Some("gateways")
        );
    }

    #[tokio::test]
    async fn test_null_entry_does_not_discard_the_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "375153": { "title": "Invoices" },
                "28530": { "title": "Recurring Payments" },
                "999": null
            })))
            .mount(&server)
            .await;

        let catalog = source_for(&server).await.fetch_catalog().await.unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("999").is_none());
    }

    #[tokio::test]
    async fn test_non_200_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = source_for(&server).await.fetch_catalog().await;

        assert!(matches!(result, Err(Error::UnexpectedStatus(500))));
    }

    #[tokio::test]
    async fn test_garbage_body_is_a_serialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let result = source_for(&server).await.fetch_catalog().await;

        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_remote_error() {
        // Port 9 (discard) is not expected to be listening locally
        let source =
            HttpCatalogSource::new("http://127.0.0.1:9/", Duration::from_millis(500)).unwrap();

        let result = source.fetch_catalog().await;

        assert!(matches!(result, Err(Error::Remote(_))));
    }

    #[test]
    fn test_from_config_uses_products_url() {
        let config = Config::from_lookup(|name| {
            (name == "EDD_PRODUCTS_URL").then(|| "http://localhost:9000/".to_string())
        });

        let source = HttpCatalogSource::from_config(&config).unwrap();

        assert_eq!(source.base_url(), "http://localhost:9000/");
    }
}
