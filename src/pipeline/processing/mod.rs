// Pipeline processing: header fixes, cleaning, validation, anonymization

pub mod anonymize;
pub mod cleaning;
pub mod compatibility;
pub mod dates;
pub mod dedupe;
pub mod headers;
pub mod junk;
pub mod table;

pub use anonymize::{anonymize, AnonymousIdMap};
pub use cleaning::{CleanOutcome, CleaningPipeline, CleaningStats};
pub use compatibility::{check_compatibility, check_required_columns, BaselineSchema, CompatibilityCheck, Rejection};
pub use dates::parse_dates;
pub use dedupe::dedupe_to_daily;
pub use headers::normalize_headers;
pub use junk::strip_junk;
pub use table::{CleanTable, RawTable};
