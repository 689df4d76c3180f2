/// Column names used by the access-control export and the cleaned table.
/// The export splits two headers across rows, which leaves the short forms
/// `Person` and `Access` in the header line.

// Headers as they arrive from the export quirk
pub const RAW_PERSON_TYPE: &str = "Person";
pub const RAW_ACCESS_DATE: &str = "Access";

// Canonical headers
pub const PERSON_TYPE: &str = "Person Type";
pub const ACCESS_DATE: &str = "Access Date";
pub const DAY_OF_WEEK: &str = "Day Of Week";
pub const ANON_ID: &str = "anon_id";

// Identity-bearing columns, dropped during anonymization
pub const LAST_NAME: &str = "Last Name";
pub const FIRST_NAME: &str = "First Name";
pub const CDSID: &str = "CDSID";

// Sub-day resolution columns, dropped during dedupe
pub const READER_DESCRIPTION: &str = "Reader Description";
pub const TRANSACTION_TYPE: &str = "Transaction Type";

/// Always-empty column some export versions carry
pub const JUNK_COLUMN: &str = "Category Used";

/// Strict day/month/year format of the access timestamp
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Header renames applied by `normalize_headers`, as (source, target)
pub const HEADER_RENAMES: [(&str, &str); 2] = [
    (RAW_PERSON_TYPE, PERSON_TYPE),
    (RAW_ACCESS_DATE, ACCESS_DATE),
];

/// Columns an upload must carry after header normalization
pub const REQUIRED_COLUMNS: [&str; 3] = [ACCESS_DATE, CDSID, PERSON_TYPE];

/// Columns that carry the subject's identity
pub const IDENTITY_COLUMNS: [&str; 3] = [LAST_NAME, FIRST_NAME, CDSID];

/// Name columns a comparison file may reasonably leave out; excluded from
/// the "required" list shown in schema mismatch diagnostics
pub const OPTIONAL_NAME_COLUMNS: [&str; 2] = [LAST_NAME, FIRST_NAME];

/// Header of the exported CSV, in `AccessEvent` order
pub const EXPORT_HEADERS: [&str; 4] = [ACCESS_DATE, DAY_OF_WEEK, PERSON_TYPE, ANON_ID];

/// File extensions accepted for upload
pub const CSV_EXTENSION: &str = "csv";
pub const XLSX_EXTENSION: &str = "xlsx";
