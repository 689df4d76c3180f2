use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::ports::EventTableOutputPort;
use crate::domain::EventTable;
use crate::export::write_events_csv_file;
use crate::session::UploadRole;

/// File-based implementation of EventTableOutputPort.
/// Writes `<dir>/<role>_<source stem>_clean.csv`.
pub struct CsvFileOutputAdapter {
    directory: PathBuf,
}

impl CsvFileOutputAdapter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn path_for(&self, role: UploadRole, source: &str) -> PathBuf {
        let stem = Path::new(source)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("upload");
        self.directory.join(format!("{}_{}_clean.csv", role.as_str(), stem))
    }
}

impl EventTableOutputPort for CsvFileOutputAdapter {
    fn write_events(&self, role: UploadRole, source: &str, events: &EventTable) -> anyhow::Result<PathBuf> {
        let path = self.path_for(role, source);
        write_events_csv_file(events, &path)
            .with_context(|| format!("Failed to write cleaned table to {}", path.display()))?;
        info!(path = %path.display(), events = events.len(), "Wrote cleaned table");
        Ok(path)
    }
}
