//! Report persistence.
//!
//! Reports land in a flat directory under timestamped names. When a write
//! fails the caller is expected to retry through [`ReportWriter::write_emergency`],
//! which uses a distinct filename prefix so partial and emergency artifacts
//! stay distinguishable.

use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::Local;
use thiserror::Error;

use crate::utilities::string_utils::sanitize_destination;

/// Default directory reports are written to.
pub const DEFAULT_REPORTS_DIR: &str = "reports";

/// Failures while persisting an assembled report.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("could not create reports directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("could not write report '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Writes report documents into the reports directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    reports_dir: PathBuf,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(DEFAULT_REPORTS_DIR)
    }
}

impl ReportWriter {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    pub fn reports_dir(&self) -> &PathBuf {
        &self.reports_dir
    }

    /// Write a full travel plan, named after the destination and the
    /// current wall-clock second.
    pub fn write_report(
        &self,
        destination: &str,
        content: &str,
    ) -> Result<PathBuf, AggregationError> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!(
            "travel_plan_{}_{}.md",
            sanitize_destination(destination),
            timestamp
        );
        self.write_unique(&filename, content)
    }

    /// Write an emergency report under its own filename prefix.
    pub fn write_emergency(&self, content: &str) -> Result<PathBuf, AggregationError> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("emergency_report_{}.md", timestamp);
        self.write_unique(&filename, content)
    }

    /// Write `content` under `filename`, appending a numeric suffix when
    /// two runs collide within the same second.
    fn write_unique(&self, filename: &str, content: &str) -> Result<PathBuf, AggregationError> {
        fs::create_dir_all(&self.reports_dir).map_err(|source| AggregationError::CreateDir {
            path: self.reports_dir.clone(),
            source,
        })?;

        let stem = filename.strip_suffix(".md").unwrap_or(filename);
        let mut path = self.reports_dir.join(filename);
        let mut attempt = 2;
        while path.exists() {
            path = self.reports_dir.join(format!("{}_{}.md", stem, attempt));
            attempt += 1;
        }

        fs::write(&path, content).map_err(|source| AggregationError::Write {
            path: path.clone(),
            source,
        })?;
        log::info!("Wrote report to {}", path.display());
        Ok(path)
    }
}
