use calamine::{open_workbook_auto, Data, DataType, Reader};
use std::path::Path;
use tracing::debug;

use super::clean_cell;
use crate::constants::DATE_FORMAT;
use crate::error::{PipelineError, Result};
use crate::pipeline::processing::RawTable;

/// Read the first worksheet of a workbook; its first row is the header.
pub fn read_xlsx_file(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| PipelineError::EmptyWorkbook(path.display().to_string()))?;
    debug!(sheet = %sheet_name, "Reading worksheet");

    let range = workbook.worksheet_range(&sheet_name)?;
    let mut rows = range.rows();

    let Some(header_row) = rows.next() else {
        return Ok(RawTable::default());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell_to_value(cell).unwrap_or_default())
        .collect();

    let rows: Vec<Vec<Option<String>>> = rows
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .map(|row| row.iter().map(cell_to_value).collect())
        .collect();

    RawTable::new(headers, rows)
}

/// Render a cell the way the same value would appear in a CSV export.
/// Date cells become `DD/MM/YYYY` so they go through the same strict parse.
fn cell_to_value(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => clean_cell(s),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                Some(format!("{:.0}", f))
            } else {
                Some(format!("{}", f))
            }
        }
        Data::Int(i) => Some(format!("{}", i)),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => Some(dt.format(DATE_FORMAT).to_string()),
            None => clean_cell(&cell.to_string()),
        },
        Data::DurationIso(s) => clean_cell(s),
        // Error cells carry no usable value
        Data::Error(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonexistent_workbook_is_an_error() {
        let result = read_xlsx_file(Path::new("/nonexistent/swipes.xlsx"));
        assert!(result.is_err());
    }

    #[test]
    fn test_numeric_cells_render_like_csv() {
        assert_eq!(cell_to_value(&Data::Float(42.0)), Some("42".to_string()));
        assert_eq!(cell_to_value(&Data::Float(1.5)), Some("1.5".to_string()));
        assert_eq!(cell_to_value(&Data::Int(7)), Some("7".to_string()));
    }

    #[test]
    fn test_empty_and_blank_cells_are_missing() {
        assert_eq!(cell_to_value(&Data::Empty), None);
        assert_eq!(cell_to_value(&Data::String("  ".to_string())), None);
        assert_eq!(cell_to_value(&Data::String(" AB1 ".to_string())), Some("AB1".to_string()));
    }

    #[test]
    fn test_iso_datetime_cells_become_day_month_year() {
        let cell = Data::DateTimeIso("2022-11-03T08:15:00".to_string());
        assert_eq!(cell_to_value(&cell), Some("03/11/2022".to_string()));
    }
}
