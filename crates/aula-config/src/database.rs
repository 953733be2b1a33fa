//! libSQL database configuration.

use serde::{Deserialize, Serialize};

/// Default local database path, relative to the project root.
fn default_path() -> String {
    ".aula/aula.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Local database file path, or `":memory:"` for an ephemeral database.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote database URL for embedded replica mode (e.g., `libsql://campus.example.io`).
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote database.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Whether remote replica sync is configured.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local_only() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, ".aula/aula.db");
        assert!(!config.is_remote());
    }

    #[test]
    fn remote_requires_url_and_token() {
        let mut config = DatabaseConfig {
            url: "libsql://campus.example.io".into(),
            ..Default::default()
        };
        assert!(!config.is_remote());
        config.auth_token = "token123".into();
        assert!(config.is_remote());
    }
}
