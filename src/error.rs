use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV read/write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet read failed: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Incompatible file '{file_name}'. Try .csv or .xlsx")]
    UnsupportedFileType { file_name: String },

    #[error("Workbook '{0}' has no worksheets")]
    EmptyWorkbook(String),

    #[error("Row {line} has {found} fields but the header has {expected}")]
    MalformedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Row {row}: '{value}' is not a DD/MM/YYYY date: {source}")]
    DateParse {
        row: usize,
        value: String,
        #[source]
        source: AccessDateError,
    },
}

/// Why a single access date was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessDateError {
    #[error("year must have exactly four digits")]
    YearWidth,

    #[error(transparent)]
    Format(#[from] chrono::ParseError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
