// Data processing pipeline: ingestion of uploads and the cleaning stages

pub mod ingestion;
pub mod processing;

// Re-export key types and functions from each stage
pub use ingestion::{load_table, FileKind};
pub use processing::{BaselineSchema, CleanOutcome, CleaningPipeline, RawTable, Rejection};
