use crate::core::{WineRecord, WineSource};
use crate::utils::error::{Result, SommelierError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_CATALOG_URL: &str = "https://api.sampleapis.com/wines";

/// Wine catalog REST API: `GET {base_url}/{category}` returns a JSON array of wines.
pub struct HttpWineSource {
    client: Client,
    base_url: String,
}

impl HttpWineSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fails if the HTTP client cannot be built with the requested timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn category_url(&self, category: &str) -> String {
        format!("{}/{}", self.base_url, category)
    }
}

#[async_trait]
impl WineSource for HttpWineSource {
    async fn fetch_category(&self, category: &str, limit: usize) -> Result<Vec<WineRecord>> {
        let url = self.category_url(category);
        tracing::debug!("Making catalog request to: {}", url);

        let response = self.client.get(&url).send().await?;
        tracing::debug!("Catalog response status: {}", response.status());

        if !response.status().is_success() {
            return Err(SommelierError::catalog(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        let json_data: serde_json::Value = response.json().await?;
        let serde_json::Value::Array(items) = json_data else {
            return Err(SommelierError::catalog(format!(
                "{} did not return a JSON array",
                url
            )));
        };

        // Records past the limit are never shown, so they are never decoded.
        items
            .into_iter()
            .take(limit)
            .map(|item| serde_json::from_value::<WineRecord>(item).map_err(SommelierError::from))
            .collect()
    }
}
