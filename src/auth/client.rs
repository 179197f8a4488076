//! Email/password and Google sign-in against the CallMed auth API.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::config::{Config, join_url};
use crate::error::AuthError;
use crate::onboarding::registry::Role;

/// Shown when the auth request never completed.
pub const AUTH_NETWORK_MESSAGE: &str = "Network error. Please try again.";
const AUTH_FALLBACK_MESSAGE: &str = "Authentication failed";
const GOOGLE_FALLBACK_MESSAGE: &str = "Google authentication failed";

pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Authenticated user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Selects which onboarding wizard the user goes through.
    pub role: Role,
}

/// A successful sign-in.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: SecretString,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<&'a str>,
}

#[derive(Serialize)]
struct GoogleBody<'a> {
    credential: &'a str,
    role: Role,
}

#[derive(Deserialize)]
struct RawUser {
    #[serde(default, alias = "_id")]
    id: Option<serde_json::Value>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, rename = "fullName")]
    full_name: Option<String>,
    role: String,
}

#[derive(Deserialize)]
struct RawAuthResponse {
    user: RawUser,
    token: String,
}

/// Reject obviously bad credentials before touching the network.
pub fn check_credentials(
    email: &str,
    password: &str,
    full_name: Option<&str>,
) -> Result<(), AuthError> {
    if !EMAIL_RE.is_match(email) {
        return Err(AuthError::Invalid(
            "Please enter a valid email address.".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Invalid(
            "Password must be at least 8 characters.".to_string(),
        ));
    }
    if let Some(name) = full_name
        && name.trim().is_empty()
    {
        return Err(AuthError::Invalid("Full Name is required.".to_string()));
    }
    Ok(())
}

impl AuthError {
    /// Text to show next to the sign-in form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(msg) | Self::Rejected(msg) => msg.clone(),
            Self::Network(_) | Self::InvalidResponse(_) => AUTH_NETWORK_MESSAGE.to_string(),
            Self::Role(_) => AUTH_FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Client for `/api/auth/*`.
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        Self::new(&config.api_base_url, config.request_timeout)
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, &format!("/api/auth/{path}"))
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<AuthSession, AuthError> {
        check_credentials(email, password, None)?;
        let body = CredentialsBody {
            email,
            password,
            role,
            full_name: None,
        };
        self.post("login", &body, AUTH_FALLBACK_MESSAGE).await
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        role: Role,
        full_name: &str,
    ) -> Result<AuthSession, AuthError> {
        check_credentials(email, password, Some(full_name))?;
        let body = CredentialsBody {
            email,
            password,
            role,
            full_name: Some(full_name),
        };
        self.post("signup", &body, AUTH_FALLBACK_MESSAGE).await
    }

    /// Exchange a Google ID token credential for a CallMed session.
    pub async fn google(&self, credential: &str, role: Role) -> Result<AuthSession, AuthError> {
        if credential.trim().is_empty() {
            return Err(AuthError::Invalid(GOOGLE_FALLBACK_MESSAGE.to_string()));
        }
        let body = GoogleBody { credential, role };
        self.post("google", &body, GOOGLE_FALLBACK_MESSAGE).await
    }

    async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<AuthSession, AuthError> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_string());
            tracing::warn!(endpoint = path, status = status.as_u16(), "Authentication rejected");
            return Err(AuthError::Rejected(message));
        }

        let raw: RawAuthResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        let role: Role = raw.user.role.parse()?;
        let id = raw.user.id.and_then(|v| match v {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        tracing::info!(endpoint = path, role = %role, "Authenticated");
        Ok(AuthSession {
            user: AuthUser {
                id,
                email: raw.user.email,
                full_name: raw.user.full_name,
                role,
            },
            token: SecretString::from(raw.token),
        })
    }
}
