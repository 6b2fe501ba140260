// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report session lifecycle.
//!
//! A session is opened once before any result is produced and flushed once
//! after the last one. For the directory-backed writer this is where the
//! results directory gets prepared.

use crate::errors::SessionError;
use camino::{Utf8Path, Utf8PathBuf};

/// Hooks invoked at the boundaries of a report run.
pub trait ReportSession: Send + Sync {
    /// Prepares the backing storage before the first result.
    fn open(&self) -> Result<(), SessionError>;

    /// Finalizes the backing storage after the last result.
    fn flush(&self) -> Result<(), SessionError>;
}

/// Prepares a results directory on disk, optionally wiping stale output
/// from a previous run.
pub struct DirectorySession {
    dir: Utf8PathBuf,
    clean: bool,
}

impl DirectorySession {
    /// Creates a session for `dir`. When `clean` is true, `open` removes
    /// any existing directory content first.
    pub fn new(dir: impl Into<Utf8PathBuf>, clean: bool) -> Self {
        DirectorySession { dir: dir.into(), clean }
    }

    /// The directory this session manages.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }
}

impl ReportSession for DirectorySession {
    fn open(&self) -> Result<(), SessionError> {
        if self.clean && self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)
                .map_err(|error| SessionError::Clean { path: self.dir.clone(), error })?;
            tracing::info!(dir = %self.dir, "removed stale report output");
        }
        std::fs::create_dir_all(&self.dir)
            .map_err(|error| SessionError::Create { path: self.dir.clone(), error })?;
        tracing::info!(dir = %self.dir, "report session opened");
        Ok(())
    }

    fn flush(&self) -> Result<(), SessionError> {
        tracing::info!(dir = %self.dir, "report session flushed");
        Ok(())
    }
}

/// A session with no backing storage to prepare. Used for dry runs and
/// in-memory backends.
#[derive(Default)]
pub struct NoopSession;

impl ReportSession for NoopSession {
    fn open(&self) -> Result<(), SessionError> {
        Ok(())
    }

    fn flush(&self) -> Result<(), SessionError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_the_results_directory() {
        let root = camino_tempfile::tempdir().expect("temp dir created");
        let dir = root.path().join("results");
        let session = DirectorySession::new(dir.clone(), false);

        session.open().expect("open succeeds");
        assert!(dir.is_dir());
    }

    #[test]
    fn open_with_clean_discards_previous_output() {
        let root = camino_tempfile::tempdir().expect("temp dir created");
        let dir = root.path().join("results");
        std::fs::create_dir_all(&dir).expect("dir created");
        std::fs::write(dir.join("stale-result.json"), b"{}").expect("stale file written");

        DirectorySession::new(dir.clone(), true).open().expect("open succeeds");
        assert!(dir.is_dir());
        assert!(!dir.join("stale-result.json").exists());
    }

    #[test]
    fn open_without_clean_keeps_previous_output() {
        let root = camino_tempfile::tempdir().expect("temp dir created");
        let dir = root.path().join("results");
        std::fs::create_dir_all(&dir).expect("dir created");
        std::fs::write(dir.join("kept-result.json"), b"{}").expect("file written");

        DirectorySession::new(dir.clone(), false).open().expect("open succeeds");
        assert!(dir.join("kept-result.json").exists());
    }
}
