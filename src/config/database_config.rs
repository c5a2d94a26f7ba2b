//! Database connector configuration parsing from environment variables.

use std::env;

/// Database environment configuration
#[derive(Debug, Clone, Default)]
pub struct DatabaseEnvConfig {
    /// Connection URL; no connector is started when unset
    pub url: Option<String>,
}

impl DatabaseEnvConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()),
        }
    }
}
