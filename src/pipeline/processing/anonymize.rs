use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::table::{AnonymizedRow, AnonymizedTable, DatedTable};
use crate::constants::{CDSID, IDENTITY_COLUMNS};
use crate::error::{PipelineError, Result};

/// Dense anonymous codes for a set of raw identifiers.
///
/// Codes follow sorted-value order: distinct identifiers are sorted by byte
/// order and numbered from 0. The same identifier set always yields the same
/// codes; adding or removing identifiers can shift them. Codes are therefore
/// local to one pipeline run and are not comparable across uploads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnonymousIdMap {
    codes: BTreeMap<String, u32>,
}

impl AnonymousIdMap {
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = identifiers
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        let codes = distinct
            .into_iter()
            .zip(0u32..)
            .collect();
        Self { codes }
    }

    pub fn code(&self, identifier: &str) -> Option<u32> {
        self.codes.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Replace the credential code with an anonymous id and drop every
/// identity-bearing column (name pair and credential). Nothing in the output
/// can be joined back to a person.
pub fn anonymize(table: DatedTable) -> Result<AnonymizedTable> {
    let id_index = table
        .column_index(CDSID)
        .ok_or_else(|| PipelineError::MissingColumn(CDSID.to_string()))?;

    let ids = AnonymousIdMap::from_identifiers(table.rows.iter().map(|r| r.values[id_index].as_str()));

    let keep: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !IDENTITY_COLUMNS.contains(&h.as_str()))
        .map(|(i, _)| i)
        .collect();
    let headers = keep.iter().map(|&i| table.headers[i].clone()).collect();

    let mut rows = Vec::with_capacity(table.rows.len());
    for row in table.rows {
        let anon_id = ids
            .code(&row.values[id_index])
            .ok_or_else(|| PipelineError::MissingColumn(CDSID.to_string()))?;
        let values = keep.iter().map(|&i| row.values[i].clone()).collect();
        rows.push(AnonymizedRow {
            anon_id,
            access_date: row.access_date,
            day_of_week: row.day_of_week,
            values,
        });
    }

    debug!(people = ids.len(), rows = rows.len(), "Assigned anonymous ids");
    Ok(AnonymizedTable { headers, rows })
}
