//! REST endpoints hosting wizard sessions for a front end.

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::controller::{EditOutcome, Outcome};
use super::draft::{FieldInput, FileHandle};
use super::registry::Role;
use super::sessions::{DASHBOARD_ROUTE, WizardSession, WizardSessions};
use crate::error::WizardError;

/// Shared state for wizard routes.
#[derive(Clone)]
pub struct WizardRouteState {
    pub sessions: Arc<WizardSessions>,
    /// Attachments are only accepted from under this directory.
    pub upload_root: PathBuf,
}

/// Build the wizard REST routes.
pub fn wizard_routes(state: WizardRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/wizards", post(create_wizard))
        .route("/api/wizards/{id}", get(get_wizard).delete(delete_wizard))
        .route("/api/wizards/{id}/fields/{name}", put(set_field))
        .route("/api/wizards/{id}/files/{name}", put(set_file))
        .route("/api/wizards/{id}/back", post(back))
        .route("/api/wizards/{id}/next", post(next))
        .route("/api/wizards/{id}/jump/{index}", post(jump))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "callmed-onboarding"
    }))
}

fn error(status: StatusCode, message: impl std::fmt::Display) -> Response {
    (status, Json(serde_json::json!({"error": message.to_string()}))).into_response()
}

/// Unwrap a JSON body, answering malformed ones in the usual error shape.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| error(rejection.status(), rejection.body_text()))
}

fn wizard_error(e: WizardError) -> Response {
    let status = match e {
        WizardError::UnknownField(_) => StatusCode::NOT_FOUND,
        WizardError::Unreachable { .. }
        | WizardError::InvalidTransition { .. }
        | WizardError::NotOnStep { .. } => StatusCode::CONFLICT,
        WizardError::KindMismatch { .. } | WizardError::InvalidOption { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    error(status, e)
}

async fn lookup(state: &WizardRouteState, id: &str) -> Result<Arc<WizardSession>, Response> {
    let id = Uuid::parse_str(id).map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid wizard ID"))?;
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "Wizard not found"))
}

async fn view_json(session: &WizardSession) -> serde_json::Value {
    let controller = session.controller().lock().await;
    serde_json::json!({
        "id": session.id,
        "role": session.role,
        "created_at": session.created_at,
        "state": controller.state(),
        "view": controller.view(),
    })
}

#[derive(Deserialize)]
struct CreateRequest {
    role: String,
}

/// POST /api/wizards
async fn create_wizard(
    State(state): State<WizardRouteState>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let role: Role = match req.role.parse() {
        Ok(role) => role,
        Err(e) => return error(StatusCode::BAD_REQUEST, e),
    };
    match state.sessions.create(role).await {
        Ok(session) => (StatusCode::CREATED, Json(view_json(&session).await)).into_response(),
        Err(e) => {
            tracing::error!("Failed to start {} wizard: {}", role, e);
            error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

/// GET /api/wizards/{id}
async fn get_wizard(State(state): State<WizardRouteState>, Path(id): Path<String>) -> Response {
    match lookup(&state, &id).await {
        Ok(session) => Json(view_json(&session).await).into_response(),
        Err(resp) => resp,
    }
}

/// DELETE /api/wizards/{id}
async fn delete_wizard(State(state): State<WizardRouteState>, Path(id): Path<String>) -> Response {
    let Ok(uuid) = Uuid::parse_str(&id) else {
        return error(StatusCode::BAD_REQUEST, "Invalid wizard ID");
    };
    if state.sessions.remove(uuid).await {
        Json(serde_json::json!({"status": "abandoned"})).into_response()
    } else {
        error(StatusCode::NOT_FOUND, "Wizard not found")
    }
}

#[derive(Deserialize)]
struct FieldRequest {
    value: FieldInput,
}

/// PUT /api/wizards/{id}/fields/{name}
async fn set_field(
    State(state): State<WizardRouteState>,
    Path((id, name)): Path<(String, String)>,
    payload: Result<Json<FieldRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let session = match lookup(&state, &id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let result = session.controller().lock().await.set(&name, req.value);
    edit_response(&session, result).await
}

#[derive(Deserialize)]
struct FileRequest {
    path: PathBuf,
    #[serde(default)]
    media_type: Option<String>,
}

/// PUT /api/wizards/{id}/files/{name}
async fn set_file(
    State(state): State<WizardRouteState>,
    Path((id, name)): Path<(String, String)>,
    payload: Result<Json<FileRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let session = match lookup(&state, &id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let path = match resolve_upload(&state.upload_root, &req.path).await {
        Ok(path) => path,
        Err(resp) => return resp,
    };
    let handle = match FileHandle::from_path(&path, req.media_type.as_deref()).await {
        Ok(h) => h,
        Err(e) => {
            return error(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Cannot attach {}: {}", req.path.display(), e),
            );
        }
    };
    let result = session.controller().lock().await.set_file(&name, handle);
    edit_response(&session, result).await
}

/// Resolve a requested attachment under the upload root. Relative paths are
/// taken from the root; anything resolving outside it is refused.
async fn resolve_upload(root: &FsPath, requested: &FsPath) -> Result<PathBuf, Response> {
    let root = tokio::fs::canonicalize(root).await.map_err(|e| {
        tracing::error!(root = %root.display(), "Upload directory unavailable: {}", e);
        error(StatusCode::SERVICE_UNAVAILABLE, "Uploads are not available")
    })?;
    let resolved = tokio::fs::canonicalize(root.join(requested))
        .await
        .map_err(|e| {
            error(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Cannot attach {}: {}", requested.display(), e),
            )
        })?;
    if !resolved.starts_with(&root) {
        tracing::warn!(path = %requested.display(), "Refusing attachment outside the upload directory");
        return Err(error(
            StatusCode::FORBIDDEN,
            "Attachments must be inside the upload directory",
        ));
    }
    Ok(resolved)
}

async fn edit_response(
    session: &WizardSession,
    result: Result<EditOutcome, WizardError>,
) -> Response {
    match result {
        Ok(outcome) => {
            let mut body = view_json(session).await;
            body["edit"] = serde_json::json!(outcome);
            Json(body).into_response()
        }
        Err(e) => wizard_error(e),
    }
}

async fn outcome_response(session: &WizardSession, outcome: Outcome) -> Response {
    let mut body = view_json(session).await;
    if matches!(outcome, Outcome::Submitted { .. }) {
        body["redirect"] = serde_json::json!(DASHBOARD_ROUTE);
    }
    body["result"] = serde_json::json!(outcome);
    Json(body).into_response()
}

/// POST /api/wizards/{id}/back
async fn back(State(state): State<WizardRouteState>, Path(id): Path<String>) -> Response {
    let session = match lookup(&state, &id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let outcome = session.controller().lock().await.back();
    outcome_response(&session, outcome).await
}

/// POST /api/wizards/{id}/next
async fn next(State(state): State<WizardRouteState>, Path(id): Path<String>) -> Response {
    let session = match lookup(&state, &id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let outcome = state.sessions.next(&session).await;
    outcome_response(&session, outcome).await
}

/// POST /api/wizards/{id}/jump/{index}
async fn jump(
    State(state): State<WizardRouteState>,
    Path((id, index)): Path<(String, usize)>,
) -> Response {
    let session = match lookup(&state, &id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let result = session.controller().lock().await.jump(index);
    match result {
        Ok(outcome) => outcome_response(&session, outcome).await,
        Err(e) => wizard_error(e),
    }
}
