pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod export;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod session;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

pub use domain::{AccessEvent, EventTable};
pub use error::{AccessDateError, PipelineError, Result};
pub use pipeline::{BaselineSchema, CleanOutcome, CleaningPipeline, RawTable, Rejection};
pub use session::{Session, UploadResult, UploadRole};
