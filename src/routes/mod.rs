use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{catalog::CatalogProvider, recommendation::RecommendationEngine},
};

pub mod dishes;
pub mod recommendations;
pub mod scoring;

/// Shared state handed to every handler
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub engine: Arc<RecommendationEngine>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogProvider>, engine: RecommendationEngine) -> Self {
        Self {
            catalog,
            engine: Arc::new(engine),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dishes", get(dishes::list))
        .route("/dishes/:id", get(dishes::get))
        .route("/recommend", post(recommendations::recommend))
        .route("/scoring", get(scoring::describe))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::services::{
        catalog::{Catalog, MockCatalogProvider},
        recommendation::{EngineConfig, FuzzyConfig, RankingConfig, RuleConfig},
    };

    pub fn engine() -> RecommendationEngine {
        let config = EngineConfig::new(
            FuzzyConfig::builtin().unwrap(),
            RuleConfig::default(),
            RankingConfig::default(),
        )
        .unwrap();
        RecommendationEngine::new(config)
    }

    pub fn seeded_catalog() -> Catalog {
        Catalog::new(serde_json::from_str(include_str!("../../data/dishes.json")).unwrap())
            .unwrap()
    }

    /// Router backed by a mock provider that serves the bundled dishes
    pub fn router_with(provider: MockCatalogProvider) -> Router {
        create_router(Arc::new(AppState::new(Arc::new(provider), engine())))
    }

    pub fn seeded_provider() -> MockCatalogProvider {
        let mut provider = MockCatalogProvider::new();
        provider.expect_load().returning(|| Ok(seeded_catalog()));
        provider.expect_name().return_const("mock");
        provider
    }
}
