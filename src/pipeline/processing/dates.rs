use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::table::{CleanTable, DatedRow, DatedTable};
use crate::constants::{ACCESS_DATE, DATE_FORMAT};
use crate::error::{AccessDateError, PipelineError, Result};

/// Parse one access timestamp. Only `DD/MM/YYYY` is accepted.
///
/// chrono's `%Y` takes one to four digits, so `03/11/22` would otherwise
/// parse as year 22. The year must be exactly four ASCII digits.
pub fn parse_access_date(value: &str) -> std::result::Result<NaiveDate, AccessDateError> {
    let year = value.rsplit_once('/').map(|(_, year)| year);
    if let Some(year) = year {
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccessDateError::YearWidth);
        }
    }
    Ok(NaiveDate::parse_from_str(value, DATE_FORMAT)?)
}

/// Parse the `Access Date` column, derive the weekday, and keep only the
/// calendar date. Any value outside the fixed format fails the whole table;
/// a silently defaulted date would skew every daily aggregate.
pub fn parse_dates(table: CleanTable) -> Result<DatedTable> {
    let date_index = table
        .column_index(ACCESS_DATE)
        .ok_or_else(|| PipelineError::MissingColumn(ACCESS_DATE.to_string()))?;

    let (mut headers, rows) = table.into_parts();
    headers.remove(date_index);

    let mut dated = Vec::with_capacity(rows.len());
    for (row_number, mut values) in rows.into_iter().enumerate() {
        let raw = values.remove(date_index);
        let access_date = parse_access_date(&raw).map_err(|source| PipelineError::DateParse {
            row: row_number + 1,
            value: raw.clone(),
            source,
        })?;
        dated.push(DatedRow {
            access_date,
            day_of_week: access_date.weekday(),
            values,
        });
    }

    debug!(rows = dated.len(), "Parsed access dates");
    Ok(DatedTable { headers, rows: dated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::junk::strip_junk;
    use crate::pipeline::processing::table::RawTable;
    use chrono::Weekday;

    #[test]
    fn test_parses_day_month_year() {
        let table = strip_junk(RawTable::from_strings(
            &["CDSID", "Access Date"],
            &[&["AB1", "03/11/2022"], &["CD2", "4/11/2022"]],
        ));
        let dated = parse_dates(table).unwrap();
        assert_eq!(dated.headers, vec!["CDSID".to_string()]);
        assert_eq!(dated.rows[0].access_date, NaiveDate::from_ymd_opt(2022, 11, 3).unwrap());
        assert_eq!(dated.rows[0].day_of_week, Weekday::Thu);
        assert_eq!(dated.rows[1].day_of_week, Weekday::Fri);
        assert_eq!(dated.rows[0].values, vec!["AB1".to_string()]);
    }

    #[test]
    fn test_rejects_month_first_and_iso_dates() {
        let table = strip_junk(RawTable::from_strings(&["Access Date"], &[&["11/30/2022"]]));
        assert!(matches!(parse_dates(table), Err(PipelineError::DateParse { row: 1, .. })));

        let table = strip_junk(RawTable::from_strings(&["Access Date"], &[&["2022-11-03"]]));
        assert!(matches!(parse_dates(table), Err(PipelineError::DateParse { .. })));
    }

    #[test]
    fn test_rejects_short_years() {
        for value in ["03/11/22", "03/11/202", "03/11/+2022"] {
            let table = strip_junk(RawTable::from_strings(&["Access Date"], &[&[value]]));
            match parse_dates(table) {
                Err(PipelineError::DateParse { value: found, source, .. }) => {
                    assert_eq!(found, value);
                    assert_eq!(source, AccessDateError::YearWidth);
                }
                other => panic!("expected {} to be refused, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn test_four_digit_year_is_still_checked_by_format() {
        assert!(matches!(parse_access_date("31/02/2023"), Err(AccessDateError::Format(_))));
        assert!(matches!(parse_access_date("20221103"), Err(AccessDateError::Format(_))));
    }

    #[test]
    fn test_rejects_trailing_time_of_day() {
        let table = strip_junk(RawTable::from_strings(&["Access Date"], &[&["03/11/2022 08:15"]]));
        assert!(parse_dates(table).is_err());
    }

    #[test]
    fn test_error_names_offending_value() {
        let table = strip_junk(RawTable::from_strings(
            &["Access Date"],
            &[&["03/11/2022"], &["soon"]],
        ));
        match parse_dates(table) {
            Err(PipelineError::DateParse { row, value, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "soon");
            }
            other => panic!("expected a date parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_date_column_is_an_error() {
        let table = strip_junk(RawTable::from_strings(&["CDSID"], &[&["AB1"]]));
        assert!(matches!(parse_dates(table), Err(PipelineError::MissingColumn(_))));
    }
}
