//! Repository backend selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which repository backend to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Process-local maps, for tests and development.
    #[default]
    Memory,
    /// PostgreSQL via sqlx.
    Postgres,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

/// Repository settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// The backend to use.
    #[serde(default)]
    pub backend: BackendKind,
    /// Default time budget for a hierarchy traversal, in seconds.
    #[serde(default = "default_hierarchy_timeout")]
    pub hierarchy_timeout_seconds: u64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            hierarchy_timeout_seconds: default_hierarchy_timeout(),
        }
    }
}

fn default_hierarchy_timeout() -> u64 {
    30
}
