use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::domain::EventTable;
use crate::error::Result;

/// Write the cleaned table as UTF-8 CSV with the header
/// `Access Date,Day Of Week,Person Type,anon_id`. Dates are ISO `YYYY-MM-DD`.
pub fn write_events_csv<W: Write>(events: &EventTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if events.is_empty() {
        // serde only emits the header with the first record
        wtr.write_record(crate::constants::EXPORT_HEADERS)?;
    }
    for event in events.iter() {
        wtr.serialize(event)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn events_to_csv_string(events: &EventTable) -> Result<String> {
    let mut buf = Vec::new();
    write_events_csv(events, &mut buf)?;
    // csv output of String fields is always valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the table to `path`, creating parent directories as needed
pub fn write_events_csv_file(events: &EventTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_events_csv(events, file)
}
