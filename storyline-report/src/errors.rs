// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced while building and persisting reports.

use crate::model::NodeId;
use camino::Utf8PathBuf;
use thiserror::Error;

/// An error that occurred while operating on the report store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// A test-case operation named an id the store does not hold.
    #[error("unknown test case: {id}")]
    UnknownTestCase {
        /// The offending id.
        id: NodeId,
    },

    /// A step operation named an id the store does not hold.
    #[error("unknown step: {id}")]
    UnknownStep {
        /// The offending id.
        id: NodeId,
    },

    /// A node operation named an id that is neither an open test case nor
    /// an open step.
    #[error("unknown report node: {id}")]
    UnknownNode {
        /// The offending id.
        id: NodeId,
    },

    /// A step was opened or closed without an open parent node, violating
    /// the closure ordering invariant.
    #[error("step {id} has no open parent {parent}")]
    MissingParent {
        /// The step.
        id: NodeId,
        /// The missing parent.
        parent: NodeId,
    },

    /// A test case was written before being stopped.
    #[error("test case {id} must be stopped before it is written")]
    TestCaseNotStopped {
        /// The offending id.
        id: NodeId,
    },

    /// The store mutex was poisoned by a panic on another thread.
    #[error("report store lock poisoned")]
    Poisoned,

    /// The results writer failed.
    #[error("failed to persist results")]
    Write(#[from] WriteResultError),
}

/// An error that occurred while writing result documents or attachment
/// content.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteResultError {
    /// Failed to create the results directory.
    #[error("error creating results directory {path}")]
    CreateDir {
        /// The directory path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Failed to create a result or attachment file.
    #[error("error creating file {path}")]
    CreateFile {
        /// The file path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Failed to serialize a result document.
    #[error("error serializing result to {path}")]
    Serialize {
        /// The file path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },

    /// Failed to write file contents.
    #[error("error writing file {path}")]
    WriteFile {
        /// The file path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: std::io::Error,
    },
}

/// An error that occurred while opening or flushing a reporting session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// Failed to remove a stale results directory.
    #[error("error cleaning results directory {path}")]
    Clean {
        /// The directory path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Failed to create the results directory.
    #[error("error creating results directory {path}")]
    Create {
        /// The directory path.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: std::io::Error,
    },
}
