use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_ENGINE_PATH: &str = "./Hakkapeliitta";
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 300;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct EngineConfig {
    pub path: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub working_directory: Option<String>,
}

impl EngineConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), args: Vec::new(), working_directory: None }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE_PATH)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DriverConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    /// Stop with `quit` once this many moves have been recorded.
    #[serde(default)]
    pub max_moves: Option<usize>,
    #[serde(default)]
    pub read_timeout_ms: Option<u64>,
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

fn default_shutdown_grace_ms() -> u64 {
    DEFAULT_SHUTDOWN_GRACE_MS
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            max_moves: None,
            read_timeout_ms: None,
            shutdown_grace_ms: DEFAULT_SHUTDOWN_GRACE_MS,
        }
    }
}

impl DriverConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}
