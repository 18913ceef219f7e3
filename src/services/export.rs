use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::models::{MatchRow, RunSummary, UnmatchedRow};

/// Errors that can occur while writing reports
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output path {0} is a directory")]
    TargetIsDirectory(PathBuf),

    #[error("Output path {0} is used for more than one report")]
    DuplicateTarget(PathBuf),
}

struct StagedFile {
    file: NamedTempFile,
    target: PathBuf,
    kind: &'static str,
}

/// A set of report files written together
///
/// Each report is written to a temporary file in its target directory.
/// Nothing appears at the target paths until [`OutputBatch::commit`], so a
/// failure while writing any report leaves no report behind.
#[derive(Default)]
pub struct OutputBatch {
    staged: Vec<StagedFile>,
}

impl OutputBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn add_matches<P: AsRef<Path>>(&mut self, path: P, rows: &[MatchRow]) -> Result<(), ExportError> {
        let mut file = self.stage(path.as_ref())?;
        write_csv(&mut file, rows)?;
        self.push(file, path.as_ref(), "match report");
        Ok(())
    }

    pub fn add_unmatched<P: AsRef<Path>>(&mut self, path: P, rows: &[UnmatchedRow]) -> Result<(), ExportError> {
        let mut file = self.stage(path.as_ref())?;
        write_csv(&mut file, rows)?;
        self.push(file, path.as_ref(), "unmatched mentees");
        Ok(())
    }

    pub fn add_summary<P: AsRef<Path>>(&mut self, path: P, summary: &RunSummary) -> Result<(), ExportError> {
        let mut file = self.stage(path.as_ref())?;
        serde_json::to_writer_pretty(&mut file, summary)?;
        file.write_all(b"\n")?;
        self.push(file, path.as_ref(), "run summary");
        Ok(())
    }

    /// Move every staged report to its target path, in insertion order
    pub fn commit(self) -> Result<Vec<PathBuf>, ExportError> {
        let mut written = Vec::with_capacity(self.staged.len());
        for staged in self.staged {
            staged.file.persist(&staged.target).map_err(|e| ExportError::Io(e.error))?;
            tracing::info!(path = %staged.target.display(), "wrote {}", staged.kind);
            written.push(staged.target);
        }
        Ok(written)
    }

    fn stage(&self, target: &Path) -> Result<NamedTempFile, ExportError> {
        if target.is_dir() {
            return Err(ExportError::TargetIsDirectory(target.to_path_buf()));
        }
        if self.staged.iter().any(|s| s.target == target) {
            return Err(ExportError::DuplicateTarget(target.to_path_buf()));
        }

        let dir = match target.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };
        Ok(NamedTempFile::new_in(dir)?)
    }

    fn push(&mut self, file: NamedTempFile, target: &Path, kind: &'static str) {
        self.staged.push(StagedFile {
            file,
            target: target.to_path_buf(),
            kind,
        });
    }
}

pub fn write_matches<P: AsRef<Path>>(path: P, rows: &[MatchRow]) -> Result<(), ExportError> {
    let mut batch = OutputBatch::new();
    batch.add_matches(path, rows)?;
    batch.commit()?;
    Ok(())
}

pub fn write_unmatched<P: AsRef<Path>>(path: P, rows: &[UnmatchedRow]) -> Result<(), ExportError> {
    let mut batch = OutputBatch::new();
    batch.add_unmatched(path, rows)?;
    batch.commit()?;
    Ok(())
}

pub fn write_summary<P: AsRef<Path>>(path: P, summary: &RunSummary) -> Result<(), ExportError> {
    let mut batch = OutputBatch::new();
    batch.add_summary(path, summary)?;
    batch.commit()?;
    Ok(())
}

/// Serialize rows as CSV with a header line
pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoringWeights;

    fn create_summary() -> RunSummary {
        RunSummary {
            run_id: uuid::Uuid::new_v4(),
            generated_at: chrono::Utc::now(),
            embedder: "hash-v1".to_string(),
            total_mentees: 1,
            total_mentors: 1,
            total_slots: 1,
            matched: 1,
            unmatched: 0,
            capacity_rejections: 0,
            total_score: 3.0,
            weights: ScoringWeights::default(),
        }
    }

    fn create_unmatched() -> Vec<UnmatchedRow> {
        vec![UnmatchedRow {
            mentee_id: "1".to_string(),
            mentee_name: "Ada".to_string(),
            mentee_email: "ada@example.com".to_string(),
        }]
    }

    #[test]
    fn test_write_csv_header_and_rows() {
        let rows = vec![
            UnmatchedRow {
                mentee_id: "1".to_string(),
                mentee_name: "Ada".to_string(),
                mentee_email: "ada@example.com".to_string(),
            },
            UnmatchedRow {
                mentee_id: "2".to_string(),
                mentee_name: "Alan, Jr".to_string(),
                mentee_email: "alan@example.com".to_string(),
            },
        ];

        let mut buffer = Vec::new();
        write_csv(&mut buffer, &rows).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "mentee_id,mentee_name,mentee_email");
        assert_eq!(lines[1], "1,Ada,ada@example.com");
        assert_eq!(lines[2], "2,\"Alan, Jr\",alan@example.com");
    }

    #[test]
    fn test_write_unmatched_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("unmatched.csv");

        write_unmatched(&path, &[]).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_failed_report_leaves_no_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let unmatched_path = dir.path().join("unmatched.csv");
        let summary_dir = dir.path().join("summary");
        std::fs::create_dir(&summary_dir).unwrap();

        let mut batch = OutputBatch::new();
        batch.add_unmatched(&unmatched_path, &create_unmatched()).unwrap();
        let err = batch.add_summary(&summary_dir, &create_summary()).unwrap_err();
        drop(batch);

        assert!(matches!(err, ExportError::TargetIsDirectory(_)));
        assert!(!unmatched_path.exists());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1, "only the pre-existing directory should remain");
    }

    #[test]
    fn test_commit_writes_every_report() {
        let dir = tempfile::tempdir().unwrap();
        let unmatched_path = dir.path().join("unmatched.csv");
        let summary_path = dir.path().join("out").join("summary.json");

        let mut batch = OutputBatch::new();
        batch.add_unmatched(&unmatched_path, &create_unmatched()).unwrap();
        batch.add_summary(&summary_path, &create_summary()).unwrap();
        assert_eq!(batch.len(), 2);
        assert!(!unmatched_path.exists());

        let written = batch.commit().unwrap();

        assert_eq!(written, vec![unmatched_path.clone(), summary_path.clone()]);
        let csv = std::fs::read_to_string(&unmatched_path).unwrap();
        assert!(csv.starts_with("mentee_id,mentee_name,mentee_email"));
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
        assert_eq!(json["matched"], 1);
        assert_eq!(json["embedder"], "hash-v1");
    }

    #[test]
    fn test_same_path_for_two_reports_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        let mut batch = OutputBatch::new();
        batch.add_unmatched(&path, &create_unmatched()).unwrap();

        assert!(matches!(
            batch.add_summary(&path, &create_summary()),
            Err(ExportError::DuplicateTarget(_))
        ));
    }
}
