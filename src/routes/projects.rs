//! Project routes: snapshot, selection, insert menu, edits, import/export.
//!
//! Handlers translate HTTP into `services::project` calls and map
//! `ProjectError` to a status code in one place.

#[cfg(test)]
#[path = "projects_test.rs"]
mod projects_test;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use composer::doc::DocError;
use composer::insert::InsertError;
use composer::validate::Violation;
use composer::{Action, EditorError, NodeId, NodePatch};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::services::project::{self, InsertOutcome, ProjectError, ProjectSnapshot, SelectOutcome};
use crate::state::AppState;

// =============================================================================
// BODIES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectBody {
    #[serde(default)]
    pub node_id: Option<NodeId>,
}

#[derive(Debug, Deserialize)]
pub struct InsertBody {
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportMjmlBody {
    pub mjml: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Serialize)]
pub struct ActionsResponse {
    pub actions: Vec<Action>,
}

#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub ok: bool,
    pub revision: u64,
}

fn actions(actions: Vec<Action>) -> Json<ActionsResponse> {
    Json(ActionsResponse { actions })
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

pub(crate) fn project_error_to_status(err: ProjectError) -> StatusCode {
    match err {
        ProjectError::InvalidProjectId(_) | ProjectError::UnknownKind(_) => StatusCode::BAD_REQUEST,
        ProjectError::NotFound(_) | ProjectError::NotStored(_) => StatusCode::NOT_FOUND,
        ProjectError::Editor(e) => editor_error_to_status(&e),
        ProjectError::Store(e) => {
            warn!(error = %e, "project store error");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn editor_error_to_status(err: &EditorError) -> StatusCode {
    match err {
        EditorError::Insert(InsertError::NodeNotFound(_))
        | EditorError::Doc(DocError::NotFound(_))
        | EditorError::UnknownCommand(_) => StatusCode::NOT_FOUND,
        EditorError::Insert(InsertError::NoMenuOpen) => StatusCode::CONFLICT,
        EditorError::Insert(InsertError::NoValidInsertion { .. } | InsertError::KindNotOffered { .. })
        | EditorError::Doc(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EditorError::Parse(_) => StatusCode::BAD_REQUEST,
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/projects/:id`: project snapshot.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectSnapshot>, StatusCode> {
    let snap = project::snapshot(&state, &id)
        .await
        .map_err(project_error_to_status)?;
    Ok(Json(snap))
}

/// `POST /api/projects/:id/select`: set or clear the selection.
pub async fn select_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SelectBody>,
) -> Result<Json<SelectOutcome>, StatusCode> {
    let outcome = project::select(&state, &id, body.node_id)
        .await
        .map_err(project_error_to_status)?;
    Ok(Json(outcome))
}

/// `POST /api/projects/:id/commands/:name`: run a registered command.
pub async fn run_command(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> Result<Json<ActionsResponse>, StatusCode> {
    let result = project::run_command(&state, &id, &name)
        .await
        .map_err(project_error_to_status)?;
    Ok(actions(result))
}

/// `POST /api/projects/:id/insert`: activate a menu item.
pub async fn insert_component(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<InsertBody>,
) -> Result<(StatusCode, Json<InsertOutcome>), StatusCode> {
    let outcome = project::insert(&state, &id, &body.kind)
        .await
        .map_err(project_error_to_status)?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// `POST /api/projects/:id/menu/close`: dismiss the insert menu.
pub async fn close_menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionsResponse>, StatusCode> {
    let result = project::close_menu(&state, &id)
        .await
        .map_err(project_error_to_status)?;
    Ok(actions(result))
}

/// `PATCH /api/projects/:id/nodes/:node_id`: edit content/attributes.
pub async fn patch_node(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(String, NodeId)>,
    Json(patch): Json<NodePatch>,
) -> Result<Json<ActionsResponse>, StatusCode> {
    let result = project::update_node(&state, &id, node_id, &patch)
        .await
        .map_err(project_error_to_status)?;
    Ok(actions(result))
}

/// `DELETE /api/projects/:id/nodes/:node_id`: delete a subtree.
pub async fn delete_node(
    State(state): State<AppState>,
    Path((id, node_id)): Path<(String, NodeId)>,
) -> Result<Json<ActionsResponse>, StatusCode> {
    let result = project::delete_node(&state, &id, node_id)
        .await
        .map_err(project_error_to_status)?;
    Ok(actions(result))
}

/// `POST /api/projects/:id/clear`: clear the canvas.
pub async fn clear_canvas(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionsResponse>, StatusCode> {
    let result = project::clear(&state, &id)
        .await
        .map_err(project_error_to_status)?;
    Ok(actions(result))
}

/// `GET /api/projects/:id/export.mjml`: download the document as MJML.
pub async fn export_mjml(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, StatusCode> {
    let markup = project::export(&state, &id, query.pretty)
        .await
        .map_err(project_error_to_status)?;
    let filename = format!("email-{id}.mjml");

    Ok((
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8"),
            (CONTENT_DISPOSITION, &format!("attachment; filename=\"{filename}\"")),
        ],
        markup,
    )
        .into_response())
}

/// `POST /api/projects/:id/import.mjml`: replace the document from MJML.
pub async fn import_mjml(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ImportMjmlBody>,
) -> Result<Json<ActionsResponse>, StatusCode> {
    let result = project::import(&state, &id, &body.mjml)
        .await
        .map_err(project_error_to_status)?;
    Ok(actions(result))
}

/// `GET /api/projects/:id/validate`: containment violations.
pub async fn validate_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Violation>>, StatusCode> {
    let found = project::violations(&state, &id)
        .await
        .map_err(project_error_to_status)?;
    Ok(Json(found))
}

/// `POST /api/projects/:id/store`: write to the store now.
pub async fn store_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoreResponse>, StatusCode> {
    let revision = project::store_now(&state, &id)
        .await
        .map_err(project_error_to_status)?;
    Ok(Json(StoreResponse { ok: true, revision }))
}

/// `POST /api/projects/:id/load`: reload from the store.
pub async fn load_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionsResponse>, StatusCode> {
    let result = project::reload(&state, &id)
        .await
        .map_err(project_error_to_status)?;
    Ok(actions(result))
}
