use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::app::ports::EventTableOutputPort;
use crate::pipeline::ingestion::load_table;
use crate::session::{Session, UploadResult, UploadRole};

/// Outcome of one upload handled end to end
#[derive(Debug)]
pub struct UploadReport {
    pub result: UploadResult,
    /// Set when the cleaned table was written out
    pub output: Option<PathBuf>,
}

/// Use case for taking an uploaded file through the session's pipeline and
/// publishing the cleaned table
pub struct UploadUseCase {
    output: Box<dyn EventTableOutputPort>,
}

impl UploadUseCase {
    pub fn new(output: Box<dyn EventTableOutputPort>) -> Self {
        Self { output }
    }

    pub fn upload_file(&self, session: &mut Session, path: &Path) -> Result<UploadReport> {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let raw = load_table(path).with_context(|| format!("Failed to read upload '{}'", path.display()))?;
        let result = session
            .upload(raw, &source)
            .with_context(|| format!("Failed to clean upload '{}'", source))?;

        let output = match &result {
            UploadResult::Accepted { role, .. } => {
                let events = match role {
                    UploadRole::Baseline => session.baseline(),
                    UploadRole::Comparison => session.comparison(),
                }
                .context("Accepted upload left no table in the session")?;
                Some(self.output.write_events(*role, &source, events)?)
            }
            UploadResult::Rejected { .. } => None,
        };

        Ok(UploadReport { result, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventTable;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;

    struct RecordingOutput {
        written: Rc<RefCell<Vec<(UploadRole, String, usize)>>>,
    }

    impl EventTableOutputPort for RecordingOutput {
        fn write_events(&self, role: UploadRole, source: &str, events: &EventTable) -> anyhow::Result<PathBuf> {
            self.written.borrow_mut().push((role, source.to_string(), events.len()));
            Ok(PathBuf::from(format!("memory://{}", source)))
        }
    }

    fn use_case() -> (UploadUseCase, Rc<RefCell<Vec<(UploadRole, String, usize)>>>) {
        let written = Rc::new(RefCell::new(Vec::new()));
        let output = RecordingOutput {
            written: Rc::clone(&written),
        };
        (UploadUseCase::new(Box::new(output)), written)
    }

    #[test]
    fn test_accepted_upload_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("baseline.csv");
        fs::write(&path, "CDSID,Person,Access\nAB1,Employee,03/11/2022\nAB1,Employee,03/11/2022\n").unwrap();

        let (use_case, written) = use_case();
        let mut session = Session::new();
        let report = use_case.upload_file(&mut session, &path).unwrap();
        assert!(report.result.is_accepted());
        assert_eq!(report.output, Some(PathBuf::from("memory://baseline.csv")));
        assert_eq!(
            written.borrow().as_slice(),
            &[(UploadRole::Baseline, "baseline.csv".to_string(), 1)]
        );
    }

    #[test]
    fn test_rejected_upload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "CDSID,Access\nAB1,03/11/2022\n").unwrap();

        let (use_case, written) = use_case();
        let mut session = Session::new();
        let report = use_case.upload_file(&mut session, &path).unwrap();
        assert!(!report.result.is_accepted());
        assert!(report.output.is_none());
        assert!(written.borrow().is_empty());
    }

    #[test]
    fn test_unsupported_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swipes.txt");
        fs::write(&path, "whatever").unwrap();

        let (use_case, _) = use_case();
        let mut session = Session::new();
        let err = use_case.upload_file(&mut session, &path).unwrap_err();
        assert!(format!("{:#}", err).contains("Try .csv or .xlsx"));
        assert!(session.baseline_schema().is_none());
    }
}
