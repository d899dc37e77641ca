//! Interaction store (libSQL) configuration.

use serde::{Deserialize, Serialize};

/// Default local database path, relative to the working directory.
fn default_path() -> String {
    ".moqi/moqi.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DbConfig {
    /// Local database file, or `":memory:"`.
    #[serde(default = "default_path")]
    pub path: String,

    /// Hosted database URL (e.g., `libsql://moqi.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Auth token for the hosted database.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl DbConfig {
    /// Check if a hosted backend is configured (URL and token both set).
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }

    /// Check if the database lives only in memory.
    pub fn is_in_memory(&self) -> bool {
        self.path == ":memory:"
    }
}
