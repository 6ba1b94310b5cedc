// Adapters layer: concrete implementations of the domain ports for external services.

pub mod gemini;
pub mod http_catalog;

pub use gemini::GeminiClient;
pub use http_catalog::HttpWineSource;
