// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable persistence for finalized results.

use crate::errors::WriteResultError;
use crate::model::TestCaseResult;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;
use std::sync::{Mutex, PoisonError};

/// Writes finalized test cases and attachment content.
///
/// The store calls this once per written test case and once per published
/// attachment; writers are shared across threads.
pub trait ResultsWriter: Send + Sync {
    /// Persists a finalized test case.
    fn write_test_case(&self, test_case: &TestCaseResult) -> Result<(), WriteResultError>;

    /// Persists attachment content under the given source name.
    fn write_attachment(&self, source: &str, content: &[u8]) -> Result<(), WriteResultError>;
}

/// Writes each test case as a `<id>-result.json` document in the results
/// directory, and attachments as sibling files.
pub struct JsonResultsWriter {
    dir: Utf8PathBuf,
}

impl JsonResultsWriter {
    /// Creates a writer rooted at `dir`. The directory is created on first
    /// write.
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        JsonResultsWriter { dir: dir.into() }
    }

    /// The results directory this writer targets.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    fn ensure_dir(&self) -> Result<(), WriteResultError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|error| WriteResultError::CreateDir { path: self.dir.clone(), error })
    }
}

impl ResultsWriter for JsonResultsWriter {
    fn write_test_case(&self, test_case: &TestCaseResult) -> Result<(), WriteResultError> {
        self.ensure_dir()?;
        let path = self.dir.join(format!("{}-result.json", test_case.id));
        let file = File::create(&path)
            .map_err(|error| WriteResultError::CreateFile { path: path.clone(), error })?;
        serde_json::to_writer(file, test_case)
            .map_err(|error| WriteResultError::Serialize { path, error })
    }

    fn write_attachment(&self, source: &str, content: &[u8]) -> Result<(), WriteResultError> {
        self.ensure_dir()?;
        let path = self.dir.join(source);
        std::fs::write(&path, content)
            .map_err(|error| WriteResultError::WriteFile { path, error })
    }
}

/// A writer that keeps everything in memory, for tests and dry inspection.
#[derive(Default)]
pub struct InMemoryResultsWriter {
    results: Mutex<Vec<TestCaseResult>>,
    attachments: Mutex<Vec<(String, Vec<u8>)>>,
}

impl InMemoryResultsWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the test cases written so far, in write order.
    pub fn written(&self) -> Vec<TestCaseResult> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns the attachments written so far as `(source, content)`
    /// pairs.
    pub fn attachments(&self) -> Vec<(String, Vec<u8>)> {
        self.attachments.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ResultsWriter for InMemoryResultsWriter {
    fn write_test_case(&self, test_case: &TestCaseResult) -> Result<(), WriteResultError> {
        self.results.lock().unwrap_or_else(PoisonError::into_inner).push(test_case.clone());
        Ok(())
    }

    fn write_attachment(&self, source: &str, content: &[u8]) -> Result<(), WriteResultError> {
        self.attachments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((source.to_owned(), content.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeId;
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_result_document_named_after_the_test_case() {
        let dir = camino_tempfile::tempdir().expect("temp dir created");
        let writer = JsonResultsWriter::new(dir.path().join("results"));

        let test_case = TestCaseResult::new(NodeId::new("sc-9[1]"), "A scenario");
        writer.write_test_case(&test_case).expect("write succeeds");

        let path = dir.path().join("results").join("sc-9[1]-result.json");
        let raw = std::fs::read_to_string(path).expect("document exists");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["id"], "sc-9[1]");
        assert_eq!(value["name"], "A scenario");
        assert_eq!(value["status"], "passed");
    }

    #[test]
    fn writes_attachment_bytes() {
        let dir = camino_tempfile::tempdir().expect("temp dir created");
        let writer = JsonResultsWriter::new(dir.path().to_owned());

        writer.write_attachment("abc-attachment.txt", b"hello").expect("write succeeds");
        let content =
            std::fs::read(dir.path().join("abc-attachment.txt")).expect("attachment exists");
        assert_eq!(content, b"hello");
    }
}
