pub mod toml_config;

use crate::adapters::gemini::{DEFAULT_GENERATION_URL, DEFAULT_MODEL};
use crate::adapters::http_catalog::DEFAULT_CATALOG_URL;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_secret,
    validate_url, Validate,
};
use clap::Parser;
use std::time::Duration;

pub use toml_config::TomlConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "sommelier")]
#[command(about = "AI Sommelier wine shop web UI")]
pub struct CliConfig {
    #[arg(long, env = "SOMMELIER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "SOMMELIER_PORT", default_value = "8501")]
    pub port: u16,

    #[arg(long, env = "SOMMELIER_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    #[arg(
        long,
        env = "SOMMELIER_CATEGORIES",
        value_delimiter = ',',
        default_value = "reds,whites,sparkling"
    )]
    pub categories: Vec<String>,

    #[arg(long, default_value = "5")]
    pub per_category_limit: usize,

    #[arg(long, env = "SOMMELIER_GENERATION_URL", default_value = DEFAULT_GENERATION_URL)]
    pub generation_url: String,

    #[arg(long, env = "SOMMELIER_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, help = "Timeout for outbound HTTP calls; none by default")]
    pub request_timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn catalog_base_url(&self) -> &str {
        &self.catalog_url
    }

    fn catalog_categories(&self) -> &[String] {
        &self.categories
    }

    fn per_category_limit(&self) -> usize {
        self.per_category_limit
    }

    fn generation_base_url(&self) -> &str {
        &self.generation_url
    }

    fn generation_model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// Checks shared by every configuration source.
pub fn validate_provider(config: &dyn ConfigProvider) -> Result<()> {
    validate_secret("generation.api_key", config.api_key())?;
    validate_url("catalog.base_url", config.catalog_base_url())?;
    validate_url("generation.base_url", config.generation_base_url())?;
    validate_non_empty_string("generation.model", config.generation_model())?;
    validate_non_empty_string("server.host", config.host())?;
    validate_range("server.port", config.port(), 1, u16::MAX)?;
    validate_positive_number("catalog.categories", config.catalog_categories().len(), 1)?;
    for category in config.catalog_categories() {
        validate_non_empty_string("catalog.categories", category)?;
    }
    validate_positive_number("catalog.per_category_limit", config.per_category_limit(), 1)?;
    Ok(())
}
