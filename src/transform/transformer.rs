//! Issue files → combined training corpus
//!
//! Every `*_issues.jsonl` file in the input directory is read line by line.
//! Each line is parsed and normalized on its own: a bad line is logged and
//! skipped, never aborting its file. Good records are appended to one corpus
//! file that is truncated at the start of the run.

use super::prompts::{PromptInput, PromptSet};
use super::record::{NormalizedRecord, RawIssue};
use super::text::clean_text;
use crate::layout::project_from_file_name;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Failed to list input folder {path}: {source}")]
    InputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write corpus {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single line could not be turned into a record
    #[error("Invalid issue record: {0}")]
    Record(String),
}

/// Per-file transform counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub project: String,
    pub path: PathBuf,
    pub records: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformSummary {
    pub output: PathBuf,
    pub files: Vec<FileSummary>,
    pub records: u64,
    pub skipped: u64,
}

#[derive(Debug)]
pub struct Transformer {
    prompts: PromptSet,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(PromptSet::standard())
    }
}

impl Transformer {
    pub fn new(prompts: PromptSet) -> Self {
        Self { prompts }
    }

    pub fn prompts(&self) -> &PromptSet {
        &self.prompts
    }

    /// Maps one raw issue to its corpus record
    pub fn transform_issue(&self, issue: &RawIssue, project: &str) -> NormalizedRecord {
        let summary = clean_text(issue.summary());
        let description = clean_text(issue.description());
        let comments = issue
            .comment_bodies()
            .map(clean_text)
            .filter(|body| !body.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let input = PromptInput {
            description: &description,
            raw_summary: issue.summary().unwrap_or_default(),
            summary: &summary,
        };
        let derived = self.prompts.render_all(&input);

        let fields = issue.fields.as_ref();
        NormalizedRecord {
            id: issue.id.clone(),
            key: issue.key.clone(),
            project: project.to_string(),
            summary,
            description,
            comments,
            created: fields.and_then(|f| f.created.clone()),
            updated: fields.and_then(|f| f.updated.clone()),
            derived,
        }
    }

    /// Parses and maps one stored line
    pub fn transform_line(
        &self,
        line: &str,
        project: &str,
    ) -> Result<NormalizedRecord, TransformError> {
        let issue = RawIssue::parse(line).map_err(|e| TransformError::Record(e.to_string()))?;
        Ok(self.transform_issue(&issue, project))
    }

    /// Transforms every issue file in `input_dir` into `output`
    ///
    /// Files are visited in name order. `output` is created or truncated, along
    /// with its parent directory.
    pub fn transform_dir(
        &self,
        input_dir: &Path,
        output: &Path,
    ) -> Result<TransformSummary, TransformError> {
        let inputs = list_issue_files(input_dir)?;

        let write_err = |source| TransformError::Write {
            path: output.to_path_buf(),
            source,
        };

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let mut writer = BufWriter::new(File::create(output).map_err(write_err)?);

        let mut files = Vec::with_capacity(inputs.len());
        for (project, path) in inputs {
            info!("Transforming {}...", project);
            let summary = self.transform_file(&project, &path, &mut writer, output)?;
            debug!(
                "{}: {} records, {} skipped",
                project, summary.records, summary.skipped
            );
            files.push(summary);
        }

        writer.flush().map_err(write_err)?;

        let records: u64 = files.iter().map(|f| f.records).sum();
        let skipped: u64 = files.iter().map(|f| f.skipped).sum();
        info!(
            "Transformation complete. {} records saved to {}",
            records,
            output.display()
        );

        Ok(TransformSummary {
            output: output.to_path_buf(),
            files,
            records,
            skipped,
        })
    }

    fn transform_file<W: Write>(
        &self,
        project: &str,
        path: &Path,
        writer: &mut W,
        output: &Path,
    ) -> Result<FileSummary, TransformError> {
        let read_err = |source| TransformError::Read {
            path: path.to_path_buf(),
            source,
        };
        let write_err = |source| TransformError::Write {
            path: output.to_path_buf(),
            source,
        };

        let reader = BufReader::new(File::open(path).map_err(read_err)?);
        let mut summary = FileSummary {
            project: project.to_string(),
            path: path.to_path_buf(),
            records: 0,
            skipped: 0,
        };

        for (idx, line) in reader.split(b'\n').enumerate() {
            let line_no = idx + 1;
            let bytes = line.map_err(read_err)?;

            let record = match String::from_utf8(bytes) {
                Ok(text) if text.trim().is_empty() => continue,
                Ok(text) => self.transform_line(&text, project),
                Err(e) => Err(TransformError::Record(e.to_string())),
            };

            match record {
                Ok(record) => {
                    serde_json::to_writer(&mut *writer, &record)
                        .map_err(|e| write_err(std::io::Error::from(e)))?;
                    writer.write_all(b"\n").map_err(write_err)?;
                    summary.records += 1;
                }
                Err(e) => {
                    warn!(
                        "Error processing issue at {}:{}: {}",
                        path.display(),
                        line_no,
                        e
                    );
                    summary.skipped += 1;
                }
            }
        }

        Ok(summary)
    }
}

/// Issue files in `dir` with their derived project names, sorted by file name
fn list_issue_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, TransformError> {
    let dir_err = |source| TransformError::InputDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_err)? {
        let entry = entry.map_err(dir_err)?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let Some(project) = project_from_file_name(name) else {
            continue;
        };
        if entry.path().is_file() {
            files.push((project, entry.path()));
        }
    }

    files.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(files)
}
