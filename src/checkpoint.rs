//! Durable per-project fetch offsets
//!
//! Each project owns one checkpoint file holding `{"start_at": <offset>}`, the
//! next offset the fetcher should request. Saves replace the file through a
//! rename so a crash never leaves a truncated checkpoint behind.

use crate::layout::checkpoint_file;
use crate::project::ProjectKey;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Failed to read checkpoint {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write checkpoint {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Checkpoint {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct CheckpointFile {
    #[serde(default)]
    start_at: u64,
}

/// Reads and writes checkpoint files inside a single directory
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, project: &ProjectKey) -> PathBuf {
        checkpoint_file(&self.dir, project)
    }

    /// Returns the saved offset for `project`, or 0 when none was saved
    pub fn load(&self, project: &ProjectKey) -> Result<u64, CheckpointError> {
        let path = self.path_for(project);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No checkpoint for {} at {}", project, path.display());
                return Ok(0);
            }
            Err(source) => return Err(CheckpointError::Read { path, source }),
        };

        let checkpoint: CheckpointFile = serde_json::from_str(&contents)
            .map_err(|source| CheckpointError::Corrupt {
                path: path.clone(),
                source,
            })?;

        debug!(
            "Loaded checkpoint for {}: start_at={}",
            project, checkpoint.start_at
        );
        Ok(checkpoint.start_at)
    }

    /// Persists `offset` for `project`, replacing any previous value
    pub fn save(&self, project: &ProjectKey, offset: u64) -> Result<(), CheckpointError> {
        let path = self.path_for(project);
        let tmp_path = path.with_extension("json.tmp");
        let write_err = |source| CheckpointError::Write {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        let body = serde_json::json!({ "start_at": offset }).to_string();

        let mut file = File::create(&tmp_path).map_err(write_err)?;
        file.write_all(body.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);

        fs::rename(&tmp_path, &path).map_err(write_err)?;

        debug!("Saved checkpoint for {}: start_at={}", project, offset);
        Ok(())
    }
}
