use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use makan_api::{
    db,
    routes::{create_router, AppState},
    services::{
        recommendation::{EngineConfig, FuzzyConfig, RankingConfig, RuleConfig},
        RecommendationEngine, SqliteCatalog,
    },
};

async fn create_test_server() -> TestServer {
    let pool = db::create_pool("sqlite::memory:", 1).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    db::seed_catalog(&pool).await.unwrap();

    let config = EngineConfig::new(
        FuzzyConfig::builtin().unwrap(),
        RuleConfig::default(),
        RankingConfig::default(),
    )
    .unwrap();

    let state = AppState::new(
        Arc::new(SqliteCatalog::new(pool)),
        RecommendationEngine::new(config),
    );
    TestServer::new(create_router(Arc::new(state))).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;
    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_and_get_dishes() {
    let server = create_test_server().await;

    let response = server.get("/api/v1/dishes").await;
    response.assert_status_ok();
    let dishes: Vec<Value> = response.json();
    assert_eq!(dishes.len(), 38);

    let ids: Vec<i64> = dishes.iter().map(|d| d["id"].as_i64().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    let response = server.get("/api/v1/dishes/7").await;
    response.assert_status_ok();
    let dish: Value = response.json();
    assert_eq!(dish["name"], "Laksa");
    assert_eq!(dish["course"], "main_course");

    server
        .get("/api/v1/dishes/404")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malay_halal_recommendation() {
    let server = create_test_server().await;

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({
            "budget": 15,
            "cuisine": "malay",
            "spiciness": 5,
            "is_halal": true,
            "is_vegetarian": false
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");

    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 3);

    let scores: Vec<f64> = recommendations
        .iter()
        .map(|r| r["score"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    for recommendation in recommendations {
        assert_eq!(recommendation["dish"]["is_halal"], true);
        assert!(recommendation["dish"]["price"].as_f64().unwrap() <= 15.0);

        let reasons: Vec<&str> = recommendation["reasons"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(reasons.contains(&"Halal-certified"));
        if recommendation["dish"]["cuisine"] == "Malay" {
            assert!(reasons.contains(&"Matches your preferred cuisine"));
        }
    }
}

#[tokio::test]
async fn test_strict_diet_filters_hold() {
    let server = create_test_server().await;

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({
            "budget": 5,
            "cuisine": "Western",
            "spiciness": 0,
            "is_halal": true,
            "is_vegetarian": true,
            "meal_type": "dinner"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    for recommendation in body["recommendations"].as_array().unwrap() {
        assert_eq!(recommendation["dish"]["is_vegetarian"], true);
        assert_eq!(recommendation["dish"]["is_halal"], true);
    }
}

#[tokio::test]
async fn test_scoring_configuration() {
    let server = create_test_server().await;

    let response = server.get("/api/v1/scoring").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["fuzzy"]["weights"]["budget"], 0.5);
    assert_eq!(body["bonus_rules"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let server = create_test_server().await;

    let response = server
        .post("/api/v1/recommend")
        .content_type("application/json")
        .bytes("{ budget: ".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "request body is not valid JSON");
}

#[tokio::test]
async fn test_out_of_range_spiciness_is_rejected() {
    let server = create_test_server().await;

    let response = server
        .post("/api/v1/recommend")
        .json(&json!({ "budget": 10, "spiciness": 11 }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"], "spiciness: must be between 0 and 10");
}
