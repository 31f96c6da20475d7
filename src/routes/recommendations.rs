use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::{RequestId, ValidatedJson},
    models::{CuisinePreference, MealType, Preferences},
};

use super::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[validate(range(min = 5.0, max = 50.0, message = "must be between 5 and 50"))]
    pub budget: f64,

    #[serde(default)]
    pub cuisine: CuisinePreference,

    #[validate(range(min = 0, max = 10, message = "must be between 0 and 10"))]
    pub spiciness: i32,

    #[serde(default)]
    pub is_halal: bool,

    #[serde(default)]
    pub is_vegetarian: bool,

    #[serde(default)]
    pub meal_type: Option<MealType>,
}

impl From<RecommendationRequest> for Preferences {
    fn from(request: RecommendationRequest) -> Self {
        Preferences {
            budget: request.budget,
            cuisine: request.cuisine,
            spiciness: request.spiciness,
            is_halal: request.is_halal,
            is_vegetarian: request.is_vegetarian,
            meal_type: request.meal_type,
        }
    }
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    ValidatedJson(request): ValidatedJson<RecommendationRequest>,
) -> AppResult<Response> {
    let preferences = Preferences::from(request);
    tracing::info!(
        request_id = %request_id,
        budget = preferences.budget,
        cuisine = %preferences.cuisine,
        spiciness = preferences.spiciness,
        is_halal = preferences.is_halal,
        is_vegetarian = preferences.is_vegetarian,
        "Recommendation request"
    );

    let catalog = state.catalog.load().await?;
    let report = state.engine.recommend(&preferences, &catalog);

    Ok(Json(report).into_response())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{router_with, seeded_provider};
    use crate::{
        middleware::REQUEST_ID_HEADER,
        services::catalog::{Catalog, MockCatalogProvider},
    };
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server() -> TestServer {
        TestServer::new(router_with(seeded_provider())).unwrap()
    }

    #[tokio::test]
    async fn test_recommend_returns_ranked_list() {
        let response = server()
            .post("/api/v1/recommend")
            .json(&json!({
                "budget": 15,
                "cuisine": "Malay",
                "spiciness": 5,
                "is_halal": true,
                "is_vegetarian": false
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");

        let recommendations = body["recommendations"].as_array().unwrap();
        assert!(!recommendations.is_empty());
        assert!(recommendations.len() <= 3);
        for recommendation in recommendations {
            assert_eq!(recommendation["dish"]["is_halal"], true);
            assert!(recommendation["reasons"][0]
                .as_str()
                .unwrap()
                .starts_with("Base compatibility score"));
        }
        assert_eq!(body["summary"]["total_candidates"], 38);
    }

    #[tokio::test]
    async fn test_recommend_explains_empty_result() {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_load()
            .returning(|| Ok(Catalog::new(vec![]).unwrap()));
        provider.expect_name().return_const("mock");
        let server = TestServer::new(router_with(provider)).unwrap();

        let response = server
            .post("/api/v1/recommend")
            .json(&json!({ "budget": 20, "spiciness": 3 }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "no_results");
        assert_eq!(body["cause"], "catalog_empty");
        assert_eq!(body["suggestion"], Value::Null);
    }

    #[tokio::test]
    async fn test_recommend_rejects_out_of_range_budget() {
        let response = server()
            .post("/api/v1/recommend")
            .json(&json!({ "budget": 2, "spiciness": 3 }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["error"], "budget: must be between 5 and 50");
    }

    #[tokio::test]
    async fn test_recommend_rejects_unknown_cuisine() {
        let response = server()
            .post("/api/v1/recommend")
            .json(&json!({ "budget": 10, "cuisine": "Martian", "spiciness": 3 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recommend_requires_json_content_type() {
        let response = server()
            .post("/api/v1/recommend")
            .text(r#"{"budget": 10, "spiciness": 3}"#)
            .await;

        response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let id = "6f1c2a9e-4d0b-4b8e-9a77-1f0e5a3c2b10";
        let response = server()
            .get("/health")
            .add_header(
                HeaderName::from_static(REQUEST_ID_HEADER),
                HeaderValue::from_static(id),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(response.header(REQUEST_ID_HEADER), id);
    }
}
