//! HTTP surface for the model repository sidecar
//!
//! This crate wires the repository manager and the inference-server
//! gateway into an axum router exposing the upload, version-switch,
//! version-query, and lifecycle-proxy endpoints.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use gateway::InferenceGateway;
use repository::ModelRepository;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    /// Repository manager
    pub repository: Arc<ModelRepository>,

    /// Inference server gateway
    pub gateway: Arc<InferenceGateway>,
}

/// Builds the sidecar router.
///
/// The default body limit is disabled because model archives routinely
/// exceed it; upload handlers stream the payload to disk instead of
/// buffering it.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/upload_model", post(handlers::upload_model))
        .route("/upload_new_version/", post(handlers::upload_new_version))
        .route("/set_version/:model_name", post(handlers::set_version))
        .route("/set_semantic_version/", post(handlers::set_semantic_version))
        .route("/get_version/:model_name", get(handlers::get_version))
        .route("/get_meta/:model_name", get(handlers::get_meta))
        .route("/load_model/:model_name", post(handlers::load_model))
        .route("/unload_model/:model_name", post(handlers::unload_model))
        .route("/index/", get(handlers::index))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
