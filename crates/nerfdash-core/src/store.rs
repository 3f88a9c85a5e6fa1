//! JSON record store: the `{ items, total }` envelope the experiment
//! endpoint serves, and the on-disk document the server and CLI read.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::ExperimentRecord;

/// The experiment-list envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentSet {
    pub items: Vec<ExperimentRecord>,
    pub total: usize,
}

impl ExperimentSet {
    pub fn new(items: Vec<ExperimentRecord>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

pub fn load_set(path: &Path) -> Result<ExperimentSet> {
    let raw = fs::read_to_string(path)?;
    let set: ExperimentSet = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), records = set.items.len(), "loaded experiment set");
    Ok(set)
}

pub fn save_set(path: &Path, set: &ExperimentSet) -> Result<()> {
    let raw = serde_json::to_string_pretty(set)?;
    fs::write(path, raw)?;
    Ok(())
}
