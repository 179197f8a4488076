//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

/// Default base URL of the CallMed REST API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the auth and onboarding endpoints.
    pub api_base_url: String,
    /// Timeout applied to every outbound request.
    pub request_timeout: Duration,
    /// Directory holding the persisted auth token.
    pub session_dir: PathBuf,
    /// Address the local wizard HTTP surface binds to.
    pub bind_addr: String,
    /// Port of the local wizard HTTP surface.
    pub http_port: u16,
    /// Attachments may only be picked from under this directory.
    pub upload_dir: PathBuf,
    /// Wizard sessions untouched for this long are dropped.
    pub session_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            session_dir: default_session_dir(),
            bind_addr: "127.0.0.1".to_string(),
            http_port: 8080,
            upload_dir: default_session_dir().join("uploads"),
            session_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl Config {
    /// Build configuration from `CALLMED_*` environment variables, falling
    /// back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_base_url = std::env::var("CALLMED_API_BASE_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api_base_url);

        let request_timeout = std::env::var("CALLMED_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let session_dir = std::env::var("CALLMED_SESSION_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_dir);

        let bind_addr = std::env::var("CALLMED_BIND_ADDR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.bind_addr);

        let http_port = std::env::var("CALLMED_HTTP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.http_port);

        let upload_dir = std::env::var("CALLMED_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| session_dir.join("uploads"));

        let session_ttl = std::env::var("CALLMED_SESSION_TTL_MINS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|mins| *mins > 0)
            .map(|mins| Duration::from_secs(mins * 60))
            .unwrap_or(defaults.session_ttl);

        Self {
            api_base_url,
            request_timeout,
            session_dir,
            bind_addr,
            http_port,
            upload_dir,
            session_ttl,
        }
    }
}

/// Join an endpoint path onto an API base URL.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn default_session_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".callmed")
}
