//! Remembered selections (last data file and analysis directory) between runs.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct StateStore {
    storage_path: PathBuf,
}

impl StateStore {
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.state_path())
    }

    pub fn path(&self) -> &PathBuf {
        &self.storage_path
    }

    /// Missing or unreadable state reads as empty.
    pub fn read(&self) -> RememberedState {
        let text = match fs::read_to_string(&self.storage_path) {
            Ok(text) => text,
            Err(_) => return RememberedState::default(),
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            debug!(path = %self.storage_path.display(), error = %e, "ignoring unreadable state");
            RememberedState::default()
        })
    }

    pub fn write(&self, state: &RememberedState) -> Result<()> {
        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating state directory {}", parent.display()))?;
        }
        fs::write(&self.storage_path, serde_json::to_string_pretty(state)?)
            .with_context(|| format!("writing state file {}", self.storage_path.display()))?;
        Ok(())
    }

    pub fn clear(&self) {
        let _ = fs::remove_file(&self.storage_path);
    }
}
