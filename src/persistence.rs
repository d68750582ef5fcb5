//! Durable storage for the session gate.
//!
//! The gate is the only engine state that must survive process restarts;
//! everything else reinitializes per session. State is written as JSON via a
//! temp file + rename so a crash mid-write never leaves a torn file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::gate::GateState;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub struct GateStore {
    path: PathBuf,
}

impl GateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads persisted gate state. A missing file is a first run, not an
    /// error.
    pub fn load(&self) -> StoreResult<Option<GateState>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let state = serde_json::from_str(&contents)?;
        Ok(Some(state))
    }

    pub fn save(&self, state: &GateState) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(state)?;
        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!(path = %self.path.display(), "gate state saved");
        Ok(())
    }
}
