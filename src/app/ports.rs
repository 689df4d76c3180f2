use std::path::PathBuf;

use crate::domain::EventTable;
use crate::session::UploadRole;

/// Where cleaned tables go once an upload is accepted
pub trait EventTableOutputPort {
    /// Persist the table for download and return where it went
    fn write_events(&self, role: UploadRole, source: &str, events: &EventTable) -> anyhow::Result<PathBuf>;
}
