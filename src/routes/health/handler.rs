use axum::{extract::State, response::IntoResponse};
use serde::Serialize;

use crate::{GuardState, utils::success_to_api_response};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub security_enabled: bool,
}

#[axum::debug_handler]
pub async fn health(State(state): State<GuardState>) -> impl IntoResponse {
    success_to_api_response(HealthResponse {
        status: "ok",
        security_enabled: state.config.security_enabled(),
    })
}
