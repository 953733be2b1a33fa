//! Auth session persistence.
//!
//! The session is a reference, not a cache: it holds only the authenticated
//! student's id. The student record itself lives in the entity store and the
//! database; nothing here can go stale except the id going away entirely,
//! which callers detect by the gateway returning `None`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// The persisted session payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub student_id: String,
    pub logged_in_at: DateTime<Utc>,
}

impl AuthSession {
    #[must_use]
    pub fn new(student_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            logged_in_at: Utc::now(),
        }
    }
}

/// Reads and writes the session file in the user config directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Session store at the default location
    /// (`<user config dir>/aula/session.json`).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoConfigDir` if no user config directory exists.
    pub fn default_location() -> Result<Self, StoreError> {
        let dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::at(dir.join("aula").join("session.json")))
    }

    /// Session store at an explicit path (tests, overrides).
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current session. `Ok(None)` when logged out.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<AuthSession>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Persist a session (login).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be written.
    pub fn save(&self, session: &AuthSession) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Remove the session (logout). Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
