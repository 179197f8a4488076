//! File-backed persistence for the session token.

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use tokio::fs;

use crate::error::SessionError;

/// Key the token is stored under.
pub const TOKEN_KEY: &str = "jwt";

/// Stores the bearer token as `<dir>/jwt`.
pub struct TokenStore {
    base_path: PathBuf,
}

impl TokenStore {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn path(&self) -> PathBuf {
        self.base_path.join(TOKEN_KEY)
    }

    /// Overwrite any previously stored token.
    pub async fn save(&self, token: &SecretString) -> Result<(), SessionError> {
        let token = token.expose_secret().trim();
        if token.is_empty() {
            return Err(SessionError::Empty);
        }
        fs::create_dir_all(&self.base_path).await?;
        fs::write(self.path(), token).await?;
        tracing::debug!(path = %self.path().display(), "Session token saved");
        Ok(())
    }

    /// `None` if no token has been saved.
    pub async fn load(&self) -> Result<Option<SecretString>, SessionError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).await?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        Ok(Some(SecretString::from(raw.to_string())))
    }

    /// Sign out. Clearing an absent token is not an error.
    pub async fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(self.path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
