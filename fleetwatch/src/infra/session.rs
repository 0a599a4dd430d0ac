//! On-disk session token, the CLI's stand-in for browser local storage.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroize;

use super::credential::Credential;

/// Environment variable that overrides the stored token.
pub const TOKEN_ENV: &str = "FLEETWATCH_TOKEN";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Corrupted session file {path}: {source}")]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize, Zeroize)]
struct StoredSession {
    token: String,
    #[zeroize(skip)]
    saved_at: DateTime<Utc>,
}

/// JSON file holding the bearer token between CLI invocations.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/fleetwatch/session.json`, when the platform has one.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir()
            .map(|dir| Self::new(dir.join("fleetwatch").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is not an error: it just means nobody has signed in.
    pub fn load(&self) -> Result<Option<Credential>, SessionError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("No session file at {}", self.path.display());
                return Ok(None);
            }
            Err(source) => return Err(self.io_error(source)),
        };

        let mut stored: StoredSession = serde_json::from_str(&content)
            .map_err(|source| SessionError::Corrupted {
                path: self.path.clone(),
                source,
            })?;
        let credential = Credential::from_token(stored.token.as_str());
        stored.zeroize();
        Ok(credential)
    }

    pub fn save(&self, credential: &Credential) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut stored = StoredSession {
            token: credential.token().to_string(),
            saved_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&stored).map_err(|source| {
            SessionError::Corrupted {
                path: self.path.clone(),
                source,
            }
        })?;
        stored.zeroize();

        std::fs::write(&self.path, content).map_err(|e| self.io_error(e))?;
        restrict_permissions(&self.path).map_err(|e| self.io_error(e))?;
        info!("Saved session to {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared session at {}", self.path.display());
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// `FLEETWATCH_TOKEN` wins over the stored file.
    pub fn resolve(&self) -> Result<Option<Credential>, SessionError> {
        if let Ok(token) = std::env::var(TOKEN_ENV)
            && let Some(credential) = Credential::from_token(token)
        {
            debug!("Using credential from {}", TOKEN_ENV);
            return Ok(Some(credential));
        }
        self.load()
    }

    fn io_error(&self, source: io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
