//! Output of extracted records, one JSON file per subject and record kind.

use crate::error::StoreError;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Kind of record batch being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    CourseInfo,
    CourseOffering,
}

impl RecordKind {
    /// Directory and file-name prefix for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            RecordKind::CourseInfo => "course_info",
            RecordKind::CourseOffering => "course_offering",
        }
    }
}

/// Destination for batches of records keyed by subject.
pub trait RecordSink {
    fn write<T: Serialize>(
        &self,
        kind: RecordKind,
        subject: &str,
        records: &[T],
    ) -> Result<(), StoreError>;
}

/// Writes `<root>/<kind>/<kind>--<subject>.json`, pretty-printed.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    root: PathBuf,
}

impl JsonFileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, kind: RecordKind, subject: &str) -> PathBuf {
        self.root
            .join(kind.name())
            .join(format!("{}--{}.json", kind.name(), subject))
    }
}

impl RecordSink for JsonFileSink {
    fn write<T: Serialize>(
        &self,
        kind: RecordKind,
        subject: &str,
        records: &[T],
    ) -> Result<(), StoreError> {
        let path = self.path_for(kind, subject);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }

        let content =
            serde_json::to_string_pretty(records).map_err(|e| StoreError::json(&path, e))?;
        fs::write(&path, content).map_err(|e| StoreError::io(&path, e))?;

        info!(
            path = %path.display(),
            records = records.len(),
            "Wrote {}",
            kind.name()
        );
        Ok(())
    }
}
