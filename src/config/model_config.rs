//! Model artifact configuration parsing from environment variables.

use super::parse_env;
use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Model environment configuration
#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub path: PathBuf,
    /// Overrides the condition named by the artifact
    pub condition: Option<String>,
    /// Distinct inputs memoized; 0 disables the cache
    pub cache_capacity: usize,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model.json"),
            condition: None,
            cache_capacity: 0,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            path: PathBuf::from(env::var("MODEL_PATH").unwrap_or_else(|_| "model.json".to_string())),
            condition: env::var("MODEL_CONDITION")
                .ok()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            cache_capacity: parse_env("PREDICTION_CACHE_CAPACITY", 0)?,
        })
    }
}
