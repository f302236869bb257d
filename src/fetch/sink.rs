//! Append-only per-project issue files

use super::error::FetchError;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends raw issues to one JSONL file, one compact object per line
#[derive(Debug, Clone)]
pub struct IssueSink {
    path: PathBuf,
}

impl IssueSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `issues` and syncs the file before returning
    ///
    /// Returns the number of lines written.
    pub fn append(&self, issues: &[Value]) -> Result<usize, FetchError> {
        let sink_err = |source| FetchError::Sink {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(sink_err)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(sink_err)?;
        let mut writer = BufWriter::new(file);

        for issue in issues {
            serde_json::to_writer(&mut writer, issue)
                .map_err(|e| sink_err(std::io::Error::from(e)))?;
            writer.write_all(b"\n").map_err(sink_err)?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| sink_err(e.into_error()))?;
        file.sync_data().map_err(sink_err)?;

        Ok(issues.len())
    }
}
