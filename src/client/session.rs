//! Token persistence across restarts.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::{io::ErrorKind, path::PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use super::error::ClientError;

/// Where the bearer token lives between runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The persisted token, if any.
    async fn load(&self) -> Result<Option<SecretString>, ClientError>;

    async fn save(&self, token: &SecretString) -> Result<(), ClientError>;

    /// Removes the persisted token. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), ClientError>;
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// Keeps the token in a small JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<SecretString>, ClientError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let stored: StoredSession = serde_json::from_slice(&raw).map_err(|err| {
            ClientError::Storage(format!("corrupt session file {}: {err}", self.path.display()))
        })?;

        if stored.token.is_empty() {
            return Ok(None);
        }

        Ok(Some(SecretString::from(stored.token)))
    }

    async fn save(&self, token: &SecretString) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_vec(&StoredSession {
            token: token.expose_secret().to_string(),
        })
        .map_err(|err| ClientError::Storage(err.to_string()))?;

        tokio::fs::write(&self.path, body).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await?;
        }

        debug!(path = %self.path.display(), "Saved session");

        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local store for tests and embedders without a filesystem.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a token already stored, as if saved by a previous run.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<SecretString>, ClientError> {
        Ok(self.token.lock().await.clone().map(SecretString::from))
    }

    async fn save(&self, token: &SecretString) -> Result<(), ClientError> {
        *self.token.lock().await = Some(token.expose_secret().to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        *self.token.lock().await = None;
        Ok(())
    }
}
