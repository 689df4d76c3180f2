pub mod ports;
pub mod report_use_case;
pub mod upload_use_case;

pub use report_use_case::ReportUseCase;
pub use upload_use_case::{UploadReport, UploadUseCase};
