//! The describe endpoint: one endpoint descriptor in, one document out.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::router::AppState;
use crate::describe::orchestrator::ModelDescriber;
use crate::describe::rules::{build_param_docs, describe_with_rules};
use crate::describe::types::{Audience, DescribeRequest, DescribeResponse, Mode};

#[derive(Debug, Deserialize)]
pub struct DescribeQuery {
    mode: Option<String>,
    audience: Option<String>,
    /// With `strict=true`, unusable model output is a 502 instead of a
    /// silent fallback to the deterministic describer.
    #[serde(default)]
    strict: bool,
}

/// `POST /describe?mode=plain|rule|model&audience=…&strict=…`
pub async fn describe(
    State(state): State<AppState>,
    Query(query): Query<DescribeQuery>,
    Json(req): Json<DescribeRequest>,
) -> Result<Json<DescribeResponse>, ApiError> {
    let mode = match query.mode.as_deref() {
        Some(raw) => raw.parse::<Mode>().map_err(ApiError::BadRequest)?,
        None => state.config.default_mode,
    };
    let audience = match query.audience.as_deref() {
        Some(raw) => raw.parse::<Audience>().map_err(ApiError::BadRequest)?,
        None => Audience::default(),
    };

    let request_id = Uuid::new_v4();
    tracing::info!(
        request_id = %request_id,
        symbol = %req.symbol,
        mode = %mode,
        audience = audience.as_str(),
        "describe request"
    );

    match mode {
        Mode::Plain => Ok(Json(DescribeResponse {
            param_docs: build_param_docs(&req.params),
            ..Default::default()
        })),
        Mode::Rule => Ok(Json(describe_with_rules(&req))),
        Mode::Model => {
            let describer = ModelDescriber::new(state.generator.clone());
            match describer.describe(&req, audience).await {
                Ok(out) => Ok(Json(out)),
                Err(e) if query.strict => {
                    tracing::warn!(request_id = %request_id, symbol = %req.symbol, error = %e, "model describe failed (strict)");
                    Err(e.into())
                }
                Err(e) => {
                    tracing::warn!(request_id = %request_id, symbol = %req.symbol, error = %e, "model describe failed, using deterministic fallback");
                    Ok(Json(describe_with_rules(&req)))
                }
            }
        }
    }
}
