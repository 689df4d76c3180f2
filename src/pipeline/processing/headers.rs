use tracing::{debug, warn};

use super::table::RawTable;
use crate::constants::HEADER_RENAMES;

/// Rename the two headers the export splits across rows (`Person`, `Access`)
/// to their canonical names. Other columns are untouched.
///
/// Idempotent: once renamed, the short source names no longer match. A
/// source column is left alone when its canonical name is already present,
/// so the result never carries a duplicate header.
pub fn normalize_headers(mut table: RawTable) -> RawTable {
    for (source, target) in HEADER_RENAMES {
        let Some(index) = table.column_index(source) else {
            continue;
        };
        if table.has_column(target) {
            warn!(source, target, "Canonical header already present; leaving source column as-is");
            continue;
        }
        debug!(source, target, "Renaming header");
        table.rename_column(index, target);
    }
    table
}
