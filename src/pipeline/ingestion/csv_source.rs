use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::clean_cell;
use crate::error::{PipelineError, Result};
use crate::pipeline::processing::RawTable;

pub fn read_csv_file(path: &Path) -> Result<RawTable> {
    let file = File::open(path)?;
    read_csv(file)
}

/// Read comma-separated text with a header row. Short rows are padded with
/// missing cells; rows longer than the header are rejected.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let width = headers.len();

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        if record.len() > width {
            return Err(PipelineError::MalformedRow {
                // header is line 1
                line: record.position().map(|p| p.line() as usize).unwrap_or(i + 2),
                expected: width,
                found: record.len(),
            });
        }
        rows.push(record.iter().map(clean_cell).collect());
    }

    RawTable::new(headers, rows)
}
