use chrono::{NaiveDate, Weekday};

use crate::error::{PipelineError, Result};

/// A tabular upload as read from disk: string cells, `None` for missing values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Rows shorter than the header are padded with missing cells. A row
    /// longer than the header is a `MalformedRow` error; `line` counts the
    /// header as line 1.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, mut row)| {
                if row.len() > width {
                    return Err(PipelineError::MalformedRow {
                        line: i + 2,
                        expected: width,
                        found: row.len(),
                    });
                }
                row.resize(width, None);
                Ok(row)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { headers, rows })
    }

    /// Build a table from string literals, treating empty cells as missing.
    #[cfg(test)]
    pub(crate) fn from_strings(headers: &[&str], rows: &[&[&str]]) -> Self {
        let headers = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        if cell.trim().is_empty() {
                            None
                        } else {
                            Some(cell.to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        Self::new(headers, rows).expect("literal rows fit the header")
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub(crate) fn rename_column(&mut self, index: usize, name: &str) {
        self.headers[index] = name.to_string();
    }

    pub(crate) fn drop_column(&mut self, index: usize) {
        self.headers.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<Option<String>>>) {
        (self.headers, self.rows)
    }
}

/// Output of `strip_junk`: every cell is present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleanTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CleanTable {
    pub(crate) fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Column names in sorted order, the shape compared between uploads
    pub fn sorted_headers(&self) -> Vec<String> {
        let mut headers = self.headers.clone();
        headers.sort();
        headers
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.headers, self.rows)
    }
}

/// A row after `parse_dates`: the timestamp is a calendar date and the
/// weekday is derived; the remaining columns pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedRow {
    pub access_date: NaiveDate,
    pub day_of_week: Weekday,
    pub values: Vec<String>,
}

/// Output of `parse_dates`. `headers` names the pass-through `values`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatedTable {
    pub headers: Vec<String>,
    pub rows: Vec<DatedRow>,
}

impl DatedTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row after `anonymize`: identity columns are gone, `anon_id` replaces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnonymizedRow {
    pub anon_id: u32,
    pub access_date: NaiveDate,
    pub day_of_week: Weekday,
    pub values: Vec<String>,
}

/// Output of `anonymize`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnonymizedTable {
    pub headers: Vec<String>,
    pub rows: Vec<AnonymizedRow>,
}

impl AnonymizedTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
