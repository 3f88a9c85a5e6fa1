//! Shared application state for the Axum server.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::Deserialize;

use nerfdash_core::{store, ExperimentRecord, Result};

#[derive(Clone)]
pub struct AppState {
    /// The experiment records, loaded once at startup and mutated only by
    /// the PUT handler.
    pub records: Arc<RwLock<Vec<ExperimentRecord>>>,
    pub data_path: Arc<PathBuf>,
}

impl AppState {
    /// Load the record set from the JSON data file. A missing file starts
    /// the server empty rather than failing.
    pub fn load(data_path: PathBuf) -> Result<Self> {
        let records = if data_path.exists() {
            store::load_set(&data_path)?.items
        } else {
            tracing::warn!(path = %data_path.display(), "data file missing, starting empty");
            Vec::new()
        };
        Ok(Self {
            records: Arc::new(RwLock::new(records)),
            data_path: Arc::new(data_path),
        })
    }

    /// Build state from an in-memory record set (embedding and tests).
    pub fn with_records(records: Vec<ExperimentRecord>, data_path: PathBuf) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            data_path: Arc::new(data_path),
        }
    }
}

/// Configuration for the web server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub data_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/experiments.json"),
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Read a YAML config file (`nerfdash.yaml`); absent keys keep their
    /// defaults.
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }
}
