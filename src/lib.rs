pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod web;

pub use crate::adapters::{GeminiClient, HttpWineSource};
pub use crate::config::{CliConfig, TomlConfig};
pub use crate::core::{catalog::CatalogAggregator, session::SessionStore, sommelier::Sommelier};
pub use crate::domain::model::{UserPreferences, WineRecord};
pub use crate::utils::error::{Result, SommelierError};
pub use crate::web::{router, AppState};
