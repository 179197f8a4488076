//! Sign-in endpoints. A successful sign-in persists the token and starts the
//! onboarding wizard that matches the user's role.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use super::client::{AuthClient, AuthSession};
use super::token_store::TokenStore;
use crate::error::AuthError;
use crate::onboarding::registry::Role;
use crate::onboarding::routes::json_body;
use crate::onboarding::sessions::WizardSessions;

/// Shared state for auth routes.
#[derive(Clone)]
pub struct AuthRouteState {
    pub client: Arc<AuthClient>,
    pub tokens: Arc<TokenStore>,
    pub sessions: Arc<WizardSessions>,
}

/// Build the session REST routes.
pub fn auth_routes(state: AuthRouteState) -> Router {
    Router::new()
        .route("/api/session", axum::routing::get(status).delete(sign_out))
        .route("/api/session/login", post(login))
        .route("/api/session/signup", post(signup))
        .route("/api/session/google", post(google))
        .with_state(state)
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({"error": message.into()}))).into_response()
}

fn auth_error(e: AuthError) -> Response {
    let status = match e {
        AuthError::Invalid(_) => StatusCode::BAD_REQUEST,
        AuthError::Rejected(_) => StatusCode::UNAUTHORIZED,
        AuthError::Network(_) | AuthError::InvalidResponse(_) | AuthError::Role(_) => {
            StatusCode::BAD_GATEWAY
        }
    };
    error(status, e.user_message())
}

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
    role: Role,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignupRequest {
    email: String,
    password: String,
    role: Role,
    #[serde(default)]
    full_name: String,
}

#[derive(Deserialize)]
struct GoogleRequest {
    credential: String,
    role: Role,
}

/// POST /api/session/login
async fn login(
    State(state): State<AuthRouteState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let result = state.client.login(&req.email, &req.password, req.role).await;
    established(&state, result).await
}

/// POST /api/session/signup
async fn signup(
    State(state): State<AuthRouteState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let result = state
        .client
        .signup(&req.email, &req.password, req.role, &req.full_name)
        .await;
    established(&state, result).await
}

/// POST /api/session/google
async fn google(
    State(state): State<AuthRouteState>,
    payload: Result<Json<GoogleRequest>, JsonRejection>,
) -> Response {
    let req = match json_body(payload) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let result = state.client.google(&req.credential, req.role).await;
    established(&state, result).await
}

async fn established(state: &AuthRouteState, result: Result<AuthSession, AuthError>) -> Response {
    let session = match result {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("Sign-in failed: {}", e);
            return auth_error(e);
        }
    };

    if let Err(e) = state.tokens.save(&session.token).await {
        tracing::error!("Failed to persist session token: {}", e);
        return error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
    }

    let role = session.user.role;
    match state.sessions.create(role).await {
        Ok(wizard) => Json(serde_json::json!({
            "user": session.user,
            "wizard": {
                "id": wizard.id,
                "role": role,
            },
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to start {} wizard: {}", role, e);
            error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /api/session
async fn status(State(state): State<AuthRouteState>) -> Response {
    match state.tokens.load().await {
        Ok(token) => Json(serde_json::json!({"authenticated": token.is_some()})).into_response(),
        Err(e) => error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// DELETE /api/session
async fn sign_out(State(state): State<AuthRouteState>) -> Response {
    match state.tokens.clear().await {
        Ok(()) => {
            tracing::info!("Signed out");
            Json(serde_json::json!({"authenticated": false})).into_response()
        }
        Err(e) => error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
