use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    services::recommendation::{rules::BonusRule, EngineConfig},
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct ScoringResponse<'a> {
    #[serde(flatten)]
    pub config: &'a EngineConfig,
    pub bonus_rules: &'a [BonusRule],
}

/// Describes the active membership curves, bonus rules and ranking settings
pub async fn describe(State(state): State<Arc<AppState>>) -> AppResult<Json<serde_json::Value>> {
    let response = ScoringResponse {
        config: state.engine.config(),
        bonus_rules: state.engine.rules().rules(),
    };

    serde_json::to_value(response)
        .map(Json)
        .map_err(|e| AppError::Internal(e.to_string()))
}
