use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

use super::table::{CleanTable, RawTable};
use crate::constants::{OPTIONAL_NAME_COLUMNS, REQUIRED_COLUMNS};

/// Sorted column names captured from the first successfully loaded dataset.
/// Every later upload in the same session must match it exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineSchema(Vec<String>);

impl BaselineSchema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        columns.sort();
        Self(columns)
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }

    /// Baseline columns minus the name pair, which comparison files may omit
    pub fn required_columns(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|c| !OPTIONAL_NAME_COLUMNS.contains(&c.as_str()))
            .cloned()
            .collect()
    }
}

/// Why an upload produced no table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// The upload lacks one of the minimum columns; nothing was cleaned
    MissingRequiredColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },
    /// The upload's columns differ from the session's baseline schema
    SchemaMismatch {
        required: Vec<String>,
        found: Vec<String>,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
}

impl Rejection {
    pub fn missing(&self) -> &[String] {
        match self {
            Rejection::MissingRequiredColumns { missing, .. } => missing,
            Rejection::SchemaMismatch { missing, .. } => missing,
        }
    }

    pub fn found(&self) -> &[String] {
        match self {
            Rejection::MissingRequiredColumns { found, .. } => found,
            Rejection::SchemaMismatch { found, .. } => found,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingRequiredColumns { missing, found } => {
                writeln!(f, "Upload is missing required columns.")?;
                writeln!(f, "Missing Columns: {:?}", missing)?;
                write!(f, "Uploaded File Columns: {:?}", found)
            }
            Rejection::SchemaMismatch {
                required,
                found,
                missing,
                unexpected,
            } => {
                writeln!(f, "Columns do not match baseline file.")?;
                writeln!(f, "Required Columns: {:?}", required)?;
                writeln!(f, "Uploaded File Columns: {:?}", found)?;
                writeln!(f, "Missing Columns: {:?}", missing)?;
                write!(f, "Unexpected Columns: {:?}", unexpected)
            }
        }
    }
}

/// Result of `check_compatibility`
#[derive(Debug, Clone)]
pub struct CompatibilityCheck {
    pub table: CleanTable,
    /// The schema to carry forward: the bootstrapped one, or the unchanged baseline
    pub schema: BaselineSchema,
    /// `None` when compatible
    pub rejection: Option<Rejection>,
}

impl CompatibilityCheck {
    pub fn is_compatible(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Reject uploads lacking any of the minimum columns. Runs on the normalized
/// headers before any cleaning.
pub fn check_required_columns(table: &RawTable) -> Option<Rejection> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        return None;
    }

    let mut found = table.headers().to_vec();
    found.sort();
    warn!(?missing, "Upload is missing required columns");
    Some(Rejection::MissingRequiredColumns { missing, found })
}

/// Compare the table's sorted columns against the session baseline.
///
/// Without a baseline the table's columns become the baseline. With one, the
/// sorted lists must be equal; no subset or superset is tolerated, and on
/// mismatch the baseline is returned unchanged.
pub fn check_compatibility(table: CleanTable, baseline: Option<&BaselineSchema>) -> CompatibilityCheck {
    let found = table.sorted_headers();

    let Some(baseline) = baseline else {
        debug!(columns = ?found, "Establishing baseline schema");
        return CompatibilityCheck {
            table,
            schema: BaselineSchema(found),
            rejection: None,
        };
    };

    if baseline.columns() == found.as_slice() {
        return CompatibilityCheck {
            table,
            schema: baseline.clone(),
            rejection: None,
        };
    }

    let required = baseline.required_columns();
    let found_set: BTreeSet<&String> = found.iter().collect();
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !found_set.contains(c))
        .cloned()
        .collect();
    let unexpected: Vec<String> = found
        .iter()
        .filter(|c| !baseline.columns().contains(*c))
        .cloned()
        .collect();

    warn!(?missing, ?unexpected, "Columns do not match baseline file");
    CompatibilityCheck {
        table,
        schema: baseline.clone(),
        rejection: Some(Rejection::SchemaMismatch {
            required,
            found,
            missing,
            unexpected,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::junk::strip_junk;

    fn clean(headers: &[&str]) -> CleanTable {
        strip_junk(RawTable::from_strings(headers, &[]))
    }

    #[test]
    fn test_bootstraps_baseline_when_absent() {
        let check = check_compatibility(clean(&["Person Type", "CDSID", "Access Date"]), None);
        assert!(check.is_compatible());
        assert_eq!(
            check.schema.columns(),
            &["Access Date".to_string(), "CDSID".to_string(), "Person Type".to_string()]
        );
    }

    #[test]
    fn test_order_independent_match() {
        let baseline = BaselineSchema::new(["CDSID", "Access Date", "Person Type"]);
        let check = check_compatibility(clean(&["Person Type", "Access Date", "CDSID"]), Some(&baseline));
        assert!(check.is_compatible());
        assert_eq!(check.schema, baseline);
    }

    #[test]
    fn test_superset_is_rejected_and_baseline_unchanged() {
        let baseline = BaselineSchema::new(["CDSID", "Access Date", "Person Type"]);
        let check = check_compatibility(
            clean(&["CDSID", "Access Date", "Person Type", "Badge Colour"]),
            Some(&baseline),
        );
        assert!(!check.is_compatible());
        assert_eq!(check.schema, baseline);
        match check.rejection {
            Some(Rejection::SchemaMismatch { unexpected, missing, .. }) => {
                assert_eq!(unexpected, vec!["Badge Colour".to_string()]);
                assert!(missing.is_empty());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_required_list_excludes_name_columns() {
        let baseline = BaselineSchema::new(["Last Name", "First Name", "CDSID", "Access Date", "Person Type"]);
        let check = check_compatibility(clean(&["CDSID", "Access Date"]), Some(&baseline));
        match check.rejection {
            Some(Rejection::SchemaMismatch { required, missing, .. }) => {
                assert_eq!(
                    required,
                    vec!["Access Date".to_string(), "CDSID".to_string(), "Person Type".to_string()]
                );
                assert_eq!(missing, vec!["Person Type".to_string()]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_required_columns_gate() {
        let table = RawTable::from_strings(&["CDSID", "Access Date"], &[]);
        let rejection = check_required_columns(&table).unwrap();
        assert_eq!(rejection.missing(), &["Person Type".to_string()]);

        let table = RawTable::from_strings(&["CDSID", "Access Date", "Person Type"], &[]);
        assert!(check_required_columns(&table).is_none());
    }
}
