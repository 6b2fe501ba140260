// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The failure value carried by `failed` events, and its classification
//! into report statuses.

use storyline_report::{Status, StatusDetail};

/// A step failure as reported by the run engine.
///
/// Failures are data, not process errors: the translator converts them
/// into node status and detail and keeps going.
#[derive(Clone, Debug)]
pub struct Failure {
    /// Simple type name of the underlying error, used as the detail
    /// message when no message is present.
    pub type_name: String,
    /// Human-readable message.
    pub message: Option<String>,
    /// Stack trace or equivalent diagnostic text, carried verbatim.
    pub trace: Option<String>,
    /// What kind of failure this is.
    pub kind: FailureKind,
    /// The failure this one wraps, if any.
    pub cause: Option<Box<Failure>>,
}

/// The kind of a [`Failure`].
#[derive(Clone, Debug)]
pub enum FailureKind {
    /// A hard assertion failed.
    Assertion,
    /// A soft-assert verification failed, possibly matching known issues.
    Verification {
        /// Known issues matched by the verification.
        known_issues: Vec<KnownIssue>,
        /// True when every recorded assertion failure matched a known
        /// issue.
        known_issues_only: bool,
    },
    /// Raised from a before/after hook rather than a step body.
    Hook,
    /// An engine-internal wrapping layer around the real failure.
    Wrapper,
    /// Anything else.
    Error,
}

/// A pre-classified recurring failure signature matched by a verification.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KnownIssue {
    /// Tracker identifier of the issue.
    pub identifier: String,
    /// True when the match is only speculative; such issues are not
    /// linked on the test case.
    pub potentially_known: bool,
}

impl KnownIssue {
    /// Creates a known-issue reference.
    pub fn new(identifier: impl Into<String>, potentially_known: bool) -> Self {
        KnownIssue { identifier: identifier.into(), potentially_known }
    }
}

impl Failure {
    /// Creates a failure of the given kind.
    pub fn new(type_name: impl Into<String>, kind: FailureKind) -> Self {
        Failure { type_name: type_name.into(), message: None, trace: None, kind, cause: None }
    }

    /// Sets the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the trace.
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Sets the wrapped cause.
    pub fn with_cause(mut self, cause: Failure) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Strips wrapper layers, returning the innermost non-wrapper failure.
    ///
    /// A wrapper with no cause is returned as-is.
    pub fn unwrap_cause(&self) -> &Failure {
        let mut failure = self;
        while matches!(failure.kind, FailureKind::Wrapper) {
            match failure.cause.as_deref() {
                Some(cause) => failure = cause,
                None => break,
            }
        }
        failure
    }

    /// True when this failure came from a before/after hook: a wrapper
    /// whose immediate cause is a hook failure. Steps keep their original
    /// title for hook failures.
    pub fn is_hook_failure(&self) -> bool {
        matches!(self.kind, FailureKind::Wrapper)
            && matches!(self.cause.as_deref(), Some(cause) if matches!(cause.kind, FailureKind::Hook))
    }

    /// The status detail for this failure: the trimmed message, or the
    /// type name when no message is present, plus the trace.
    pub fn status_detail(&self) -> StatusDetail {
        let message = self
            .message
            .as_deref()
            .map_or_else(|| self.type_name.clone(), |message| message.trim().to_owned());
        StatusDetail { message: Some(message), trace: self.trace.clone(), muted: false }
    }
}

/// Resolves a failure to the status its test case should record.
pub trait StatusClassifier: Send + Sync {
    /// Classifies an (already unwrapped) failure.
    fn classify(&self, failure: &Failure) -> Status;
}

/// The standard classification table.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultClassifier;

impl StatusClassifier for DefaultClassifier {
    fn classify(&self, failure: &Failure) -> Status {
        match &failure.kind {
            FailureKind::Verification { known_issues_only: true, .. } => Status::KnownIssuesOnly,
            FailureKind::Verification { .. } | FailureKind::Assertion => Status::Failed,
            FailureKind::Hook | FailureKind::Wrapper | FailureKind::Error => Status::Broken,
        }
    }
}
