//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the project API under `/api/projects/{id}` plus a
//! liveness check. CORS is open so a browser canvas served from elsewhere can
//! drive the editor; every request is traced.

pub mod projects;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/projects/{id}", get(projects::get_project))
        .route("/api/projects/{id}/select", post(projects::select_node))
        .route("/api/projects/{id}/commands/{name}", post(projects::run_command))
        .route("/api/projects/{id}/insert", post(projects::insert_component))
        .route("/api/projects/{id}/menu/close", post(projects::close_menu))
        .route(
            "/api/projects/{id}/nodes/{node_id}",
            patch(projects::patch_node).delete(projects::delete_node),
        )
        .route("/api/projects/{id}/clear", post(projects::clear_canvas))
        .route("/api/projects/{id}/export.mjml", get(projects::export_mjml))
        .route("/api/projects/{id}/import.mjml", post(projects::import_mjml))
        .route("/api/projects/{id}/validate", get(projects::validate_project))
        .route("/api/projects/{id}/store", post(projects::store_project))
        .route("/api/projects/{id}/load", post(projects::load_project))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
