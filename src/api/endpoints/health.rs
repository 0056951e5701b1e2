//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::router::AppState;
use crate::config::{GenerationOptions, SERVICE_VERSION};
use crate::describe::types::GeneratorInfo;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mode: &'static str,
    pub generator: GeneratorInfo,
    pub options: GenerationOptions,
    /// Can the model collaborator currently be reached? Informational only.
    pub reachable: bool,
    pub version: &'static str,
}

/// `GET /healthz`: service status plus collaborator reachability.
pub async fn check(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let reachable = state.generator.is_reachable().await;

    Ok(Json(HealthResponse {
        status: "ok",
        mode: state.config.default_mode.as_str(),
        generator: state.generator.info(),
        options: state.config.ollama.options.clone(),
        reachable,
        version: SERVICE_VERSION,
    }))
}
