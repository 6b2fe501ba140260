// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report statuses and the priority order used to merge them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The status of a report node.
///
/// Variants are declared in ascending severity, and the derived [`Ord`]
/// implementation is the priority order: a node's status may only be
/// replaced by a status that compares strictly greater.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// The node completed without any recorded failure.
    Passed,
    /// The node was skipped (commented out, not implemented, or not
    /// performed because an earlier step failed).
    Skipped,
    /// The node is backed by an unimplemented step.
    ///
    /// Serialized results carry pending steps as [`Status::Skipped`] with
    /// the [`PENDING_STEP_MARKER`] detail message; this variant exists so
    /// that priority comparisons can rank them above plain skips.
    Pending,
    /// The node failed, but every failed assertion matched a known issue.
    KnownIssuesOnly,
    /// The node failed for a reason other than an assertion, for example an
    /// environment or automation error.
    Broken,
    /// The node failed an assertion.
    Failed,
}

/// Detail message marking a step backed by an unimplemented step.
///
/// Nodes carrying this message in their status detail are treated as
/// [`Status::Pending`] when their current priority is computed, even though
/// their serialized status is [`Status::Skipped`].
pub const PENDING_STEP_MARKER: &str = "The step is not implemented";

impl Status {
    /// The lowest-priority status. New nodes start here.
    pub fn lowest() -> Self {
        Status::Passed
    }

    /// Returns the integer priority of this status. Higher is more severe.
    pub fn priority(self) -> u8 {
        self as u8
    }

    /// Returns true if a node currently at `current` should take on `self`.
    ///
    /// Only a strictly higher priority overwrites; equal or lower priority
    /// candidates leave the current status in place.
    pub fn overwrites(self, current: Status) -> bool {
        self > current
    }

    /// Returns the string form used in serialized results.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Skipped => "skipped",
            Status::Pending => "pending",
            Status::KnownIssuesOnly => "known-issues-only",
            Status::Broken => "broken",
            Status::Failed => "failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
