//! Describe service router.
//!
//! Returns a composable `Router` that can be mounted on any axum server:
//! `POST /describe` (mode-selectable) and `GET /healthz`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::config::ServiceConfig;
use crate::describe::types::TextGenerator;

/// Shared state for all routes: immutable config plus the generation
/// collaborator. Cloning is cheap (two `Arc`s).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(config: ServiceConfig, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            config: Arc::new(config),
            generator,
        }
    }
}

/// Build the describe service router.
pub fn describe_router(state: AppState) -> Router {
    Router::new()
        .route("/describe", post(endpoints::describe::describe))
        .route("/healthz", get(endpoints::health::check))
        .with_state(state)
}
