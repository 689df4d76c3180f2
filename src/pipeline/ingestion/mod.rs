// Pipeline ingestion: reading uploaded CSV and XLSX files into raw tables

pub mod csv_source;
pub mod xlsx_source;

use std::path::Path;
use tracing::{info, warn};

use crate::constants::{CSV_EXTENSION, XLSX_EXTENSION};
use crate::error::{PipelineError, Result};
use crate::observability::metrics;
use crate::pipeline::processing::RawTable;

/// Upload formats the pipeline accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
}

impl FileKind {
    /// Detect the kind from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some(CSV_EXTENSION) => Ok(FileKind::Csv),
            Some(XLSX_EXTENSION) => Ok(FileKind::Xlsx),
            _ => Err(PipelineError::UnsupportedFileType {
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Csv => CSV_EXTENSION,
            FileKind::Xlsx => XLSX_EXTENSION,
        }
    }
}

/// Normalize a raw cell: surrounding whitespace is trimmed and an empty cell
/// is a missing value.
pub(crate) fn clean_cell(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read an uploaded file into a raw table. Nothing about the session changes
/// if this fails.
pub fn load_table(path: &Path) -> Result<RawTable> {
    let kind = FileKind::from_path(path).map_err(|e| {
        warn!(path = %path.display(), "Unsupported upload type");
        metrics::ingestion::file_rejected("unsupported_file_type");
        e
    })?;

    let table = match kind {
        FileKind::Csv => csv_source::read_csv_file(path)?,
        FileKind::Xlsx => xlsx_source::read_xlsx_file(path)?,
    };

    info!(
        path = %path.display(),
        kind = kind.as_str(),
        rows = table.len(),
        columns = table.headers().len(),
        "Loaded upload"
    );
    metrics::ingestion::file_loaded(kind.as_str(), table.len());
    Ok(table)
}
