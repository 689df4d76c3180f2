use tracing::debug;

use super::table::{CleanTable, RawTable};
use crate::constants::JUNK_COLUMN;

/// Drop the always-empty `Category Used` column if present, then every row
/// with a missing cell. Rows are dropped, never imputed. An upload where every
/// row is incomplete yields a valid empty table.
pub fn strip_junk(mut table: RawTable) -> CleanTable {
    if let Some(index) = table.column_index(JUNK_COLUMN) {
        debug!(column = JUNK_COLUMN, "Dropping junk column");
        table.drop_column(index);
    }

    let (headers, rows) = table.into_parts();
    let total = rows.len();
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .filter_map(|row| row.into_iter().collect::<Option<Vec<String>>>())
        .collect();

    debug!(kept = rows.len(), dropped = total - rows.len(), "Stripped incomplete rows");
    CleanTable::new(headers, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_junk_column_and_incomplete_rows() {
        let table = RawTable::from_strings(
            &["CDSID", "Category Used", "Access Date"],
            &[&["AB1", "", "03/11/2022"], &["CD2", "", ""], &["", "", "04/11/2022"]],
        );
        let clean = strip_junk(table);
        assert_eq!(clean.headers(), &["CDSID".to_string(), "Access Date".to_string()]);
        assert_eq!(clean.rows(), &[vec!["AB1".to_string(), "03/11/2022".to_string()]]);
    }

    #[test]
    fn test_missing_junk_column_is_tolerated() {
        let table = RawTable::from_strings(&["CDSID"], &[&["AB1"]]);
        let clean = strip_junk(table);
        assert_eq!(clean.len(), 1);
    }

    #[test]
    fn test_all_rows_dropped_is_an_empty_table() {
        let table = RawTable::from_strings(&["CDSID", "Access Date"], &[&["AB1", ""], &["", ""]]);
        let clean = strip_junk(table);
        assert!(clean.is_empty());
        assert_eq!(clean.headers().len(), 2);
    }

    #[test]
    fn test_result_is_null_free() {
        let table = RawTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![Some("1".to_string()), None],
                vec![None, Some("2".to_string())],
                vec![Some("3".to_string()), Some("4".to_string())],
            ],
        )
        .unwrap();
        let clean = strip_junk(table);
        assert!(clean.rows().iter().all(|row| row.len() == 2));
        assert_eq!(clean.len(), 1);
    }
}
