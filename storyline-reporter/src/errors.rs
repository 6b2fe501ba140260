// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by storyline-reporter.

use camino::Utf8PathBuf;
use storyline_report::{SessionError, StoreError};
use thiserror::Error;

/// A pop was attempted on an empty execution path.
///
/// This indicates an event arriving out of protocol order, for example a
/// step close with no matching open.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("attempted to pop an empty execution path")]
pub struct EmptyPathError;

/// A stage or run-model operation required an active story, but none was
/// started on this thread.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("no active story on this thread")]
pub struct NoActiveStoryError;

/// A given story required the root story's suite label, but the root label
/// set carries none.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("root story has no suite label to inherit")]
pub struct MissingRootSuiteError;

/// The thread-scoped state store was poisoned by a panic on another access.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("thread-scoped state store is poisoned")]
pub struct StatePoisonedError;

/// An error occurred while reading the reporter configuration file.
#[derive(Debug, Error)]
#[error("failed to read reporter configuration from `{path}`")]
pub struct ConfigReadError {
    /// The file that was being read.
    pub path: Utf8PathBuf,
    /// The underlying error.
    #[source]
    pub error: config::ConfigError,
}

/// An error returned while translating a lifecycle event.
///
/// Backend and session failures are not retried; they propagate to the run
/// engine, which decides overall run failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportEventError {
    /// The event requires an open report node, but the execution path is
    /// empty.
    #[error("{operation} arrived with no open report node")]
    NoCurrentNode {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// The execution path was popped past its root.
    #[error("execution path underflow")]
    EmptyPath(#[from] EmptyPathError),

    /// Story bookkeeping was driven out of order.
    #[error("story bookkeeping out of order")]
    NoActiveStory(#[from] NoActiveStoryError),

    /// A given story could not inherit the root suite label.
    #[error("given story label derivation failed")]
    MissingRootSuite(#[from] MissingRootSuiteError),

    /// The per-thread state store is unusable.
    #[error("thread state unavailable")]
    StatePoisoned(#[from] StatePoisonedError),

    /// A backend operation failed.
    #[error("report backend operation failed")]
    Backend(#[from] StoreError),

    /// Opening or flushing the report session failed.
    #[error("report session operation failed")]
    Session(#[from] SessionError),
}
