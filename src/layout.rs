//! On-disk layout shared by the fetch and transform stages
//!
//! The two stages only communicate through these files:
//!
//! - `<data_dir>/<project-lowercase>_issues.jsonl`: raw issues, append-only
//! - `<checkpoint_dir>/checkpoint_<PROJECT>.json`: next offset to fetch
//! - `<data_dir>/llm_corpus.jsonl`: normalized corpus, rewritten each run

use crate::project::ProjectKey;
use std::path::{Path, PathBuf};

/// Suffix shared by every per-project issue file
pub const ISSUES_FILE_SUFFIX: &str = "_issues.jsonl";

/// Default corpus file name inside the data directory
pub const CORPUS_FILE_NAME: &str = "llm_corpus.jsonl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    data_dir: PathBuf,
    checkpoint_dir: PathBuf,
}

impl DataLayout {
    pub fn new(data_dir: impl Into<PathBuf>, checkpoint_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            checkpoint_dir: checkpoint_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn checkpoint_dir(&self) -> &Path {
        &self.checkpoint_dir
    }

    pub fn issues_path(&self, project: &ProjectKey) -> PathBuf {
        self.data_dir
            .join(format!("{}{}", project.file_stem(), ISSUES_FILE_SUFFIX))
    }

    pub fn checkpoint_path(&self, project: &ProjectKey) -> PathBuf {
        checkpoint_file(&self.checkpoint_dir, project)
    }

    pub fn default_corpus_path(&self) -> PathBuf {
        self.data_dir.join(CORPUS_FILE_NAME)
    }
}

/// Path of the checkpoint file for `project` inside `dir`
pub fn checkpoint_file(dir: &Path, project: &ProjectKey) -> PathBuf {
    dir.join(format!("checkpoint_{}.json", project.as_str()))
}

/// Derives the project name from an issue file name
///
/// Only names ending in `_issues.jsonl` qualify. The project is the text before
/// the first underscore, uppercased, so `hadoop_issues.jsonl` yields `HADOOP`.
pub fn project_from_file_name(name: &str) -> Option<String> {
    if !name.ends_with(ISSUES_FILE_SUFFIX) {
        return None;
    }

    let prefix = name.split('_').next().unwrap_or_default();
    Some(prefix.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> ProjectKey {
        ProjectKey::parse(s).unwrap()
    }

    #[test]
    fn test_issue_and_checkpoint_paths() {
        let layout = DataLayout::new("data", ".");

        assert_eq!(
            layout.issues_path(&key("HADOOP")),
            PathBuf::from("data/hadoop_issues.jsonl")
        );
        assert_eq!(
            layout.checkpoint_path(&key("HADOOP")),
            PathBuf::from("./checkpoint_HADOOP.json")
        );
        assert_eq!(
            layout.default_corpus_path(),
            PathBuf::from("data/llm_corpus.jsonl")
        );
    }

    #[test]
    fn test_project_from_file_name() {
        assert_eq!(
            project_from_file_name("hadoop_issues.jsonl"),
            Some("HADOOP".to_string())
        );
        assert_eq!(
            project_from_file_name("my_proj_issues.jsonl"),
            Some("MY".to_string())
        );
    }

    #[test]
    fn test_project_from_file_name_ignores_other_files() {
        assert_eq!(project_from_file_name("llm_corpus.jsonl"), None);
        assert_eq!(project_from_file_name("hadoop_issues.json"), None);
        assert_eq!(project_from_file_name("checkpoint_HADOOP.json"), None);
    }
}
