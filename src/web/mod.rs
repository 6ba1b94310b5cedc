//! HTTP front end: routes, per-session state and page rendering.

pub mod handlers;
pub mod render;
pub mod session;

use anyhow::Result;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::adapters::{GeminiClient, HttpWineSource};
use crate::core::catalog::CatalogAggregator;
use crate::core::session::SessionStore;
use crate::core::sommelier::Sommelier;
use crate::core::ConfigProvider;

/// Shared by all handlers. The catalog cache lives as long as the process;
/// session contexts are keyed by cookie.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogAggregator>,
    pub sommelier: Arc<Sommelier>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(catalog: CatalogAggregator, sommelier: Sommelier) -> Self {
        Self {
            catalog: Arc::new(catalog),
            sommelier: Arc::new(sommelier),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    pub fn from_config(config: &dyn ConfigProvider) -> crate::utils::error::Result<Self> {
        let source =
            HttpWineSource::with_timeout(config.catalog_base_url(), config.request_timeout())?;
        let catalog = CatalogAggregator::with_categories(
            Arc::new(source),
            config.catalog_categories().to_vec(),
            config.per_category_limit(),
        );

        let generator = GeminiClient::with_timeout(
            config.api_key(),
            config.generation_model(),
            config.generation_base_url(),
            config.request_timeout(),
        )?;
        info!("Generation endpoint: {}", generator.endpoint());

        Ok(Self::new(catalog, Sommelier::new(Arc::new(generator))))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/recommend", post(handlers::recommend))
        .route("/ask", post(handlers::ask))
        .route("/cart/add", post(handlers::add_to_cart))
        .route("/cart/clear", post(handlers::clear_cart))
        .route("/wines/{index}/select", post(handlers::select_wine))
        .route("/health", get(handlers::health_check))
        .layer(middleware::from_fn(session::ensure_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: &dyn ConfigProvider, state: AppState) -> Result<()> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("AI Sommelier listening on http://{}", addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;
    Ok(())
}
