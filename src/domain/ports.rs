use crate::domain::model::WineRecord;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Read-only source of wine records grouped by category (`reds`, `whites`, ...).
#[async_trait]
pub trait WineSource: Send + Sync {
    /// Returns at most `limit` records, in the order the source lists them.
    async fn fetch_category(&self, category: &str, limit: usize) -> Result<Vec<WineRecord>>;
}

/// Hosted text-generation endpoint: one prompt in, generated text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn catalog_base_url(&self) -> &str;
    fn catalog_categories(&self) -> &[String];
    fn per_category_limit(&self) -> usize;
    fn generation_base_url(&self) -> &str;
    fn generation_model(&self) -> &str;
    fn api_key(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;

    fn bind_address(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }
}
