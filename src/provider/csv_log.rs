use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::ResultSink;
use crate::error::SubmitError;
use crate::metrics::SessionResult;

/// Appends results to a local CSV file, writing the header once.
#[derive(Debug, Clone)]
pub struct CsvResultSink {
    path: PathBuf,
}

impl CsvResultSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, result: &SessionResult) -> Result<(), SubmitError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(result)?;
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl ResultSink for CsvResultSink {
    fn name(&self) -> &str {
        "csv"
    }

    async fn submit(&self, result: &SessionResult) -> Result<(), SubmitError> {
        self.append(result)
    }
}
