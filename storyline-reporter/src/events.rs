// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lifecycle event protocol consumed from the run engine.

use crate::failure::Failure;
use crate::run_model::{Scenario, Story};
use indexmap::IndexMap;
use std::fmt;

/// Severity of a log entry published into the report.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LogLevel {
    /// Diagnostic output, rendered as a muted step.
    Debug,
    /// Informational output.
    Info,
    /// A warning, e.g. a deprecation notice.
    Warn,
    /// An error message, rendered as a failed step.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// One lifecycle notification from the run engine.
///
/// Events are delivered synchronously and in order on the thread that owns
/// the story. The cross-cutting events ([`SubStepsStart`] onward) may
/// arrive on any thread holding an open node.
///
/// [`SubStepsStart`]: StoryEvent::SubStepsStart
#[derive(Clone, Debug)]
pub enum StoryEvent {
    /// A story is starting.
    BeforeStory {
        /// The story.
        story: Story,
        /// True for a nested given story.
        given_story: bool,
    },
    /// A scenario of the current story is starting.
    BeforeScenario {
        /// The scenario.
        scenario: Scenario,
    },
    /// One example row of a data-driven scenario is starting.
    Example {
        /// Column values of this row, in table order.
        row: IndexMap<String, String>,
        /// Zero-based row index.
        index: usize,
    },
    /// A step is about to execute.
    BeforeStep {
        /// The step text.
        text: String,
    },
    /// The current step passed.
    Successful {
        /// Final step text, with parameters resolved.
        text: String,
    },
    /// The current step was commented out.
    Ignorable {
        /// The step text.
        text: String,
    },
    /// The current step has no implementation.
    Pending {
        /// The step text.
        text: String,
    },
    /// The current step was not performed because an earlier step failed.
    NotPerformed {
        /// The step text.
        text: String,
    },
    /// A comment line was reported as a step.
    Comment {
        /// The comment text.
        text: String,
    },
    /// The current step failed.
    Failed {
        /// Final step text.
        text: String,
        /// The failure.
        failure: Failure,
    },
    /// The current scenario ended.
    AfterScenario,
    /// The current story ended.
    AfterStory {
        /// True for a nested given story.
        given_story: bool,
    },
    /// The story was cancelled because it exceeded its time budget.
    StoryCancelled {
        /// The cancelled story.
        story: Story,
        /// The exceeded budget, in seconds.
        duration_secs: u64,
    },
    /// A composite step starts publishing its expansion.
    SubStepsStart,
    /// A composite step finished publishing its expansion.
    SubStepsFinish {
        /// Title of the composite step.
        title: String,
        /// The failure that ended the expansion, if any.
        failure: Option<Failure>,
    },
    /// An attachment was published for the current node.
    AttachmentPublished {
        /// Display title.
        title: String,
        /// MIME type of the content.
        content_type: String,
        /// The content.
        content: Vec<u8>,
    },
    /// A collaborator published a log entry into the report.
    LogEntry {
        /// Severity of the entry.
        level: LogLevel,
        /// The logged text.
        text: String,
    },
    /// A soft assertion failed without ending the step.
    AssertionFailed {
        /// The failure.
        failure: Failure,
    },
    /// A collaborator discovered an external resource for the test case.
    LinkPublished {
        /// Display name of the link.
        name: String,
        /// Resolved URL.
        url: String,
    },
}

impl StoryEvent {
    /// A short stable name for the event, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            StoryEvent::BeforeStory { .. } => "before-story",
            StoryEvent::BeforeScenario { .. } => "before-scenario",
            StoryEvent::Example { .. } => "example",
            StoryEvent::BeforeStep { .. } => "before-step",
            StoryEvent::Successful { .. } => "successful",
            StoryEvent::Ignorable { .. } => "ignorable",
            StoryEvent::Pending { .. } => "pending",
            StoryEvent::NotPerformed { .. } => "not-performed",
            StoryEvent::Comment { .. } => "comment",
            StoryEvent::Failed { .. } => "failed",
            StoryEvent::AfterScenario => "after-scenario",
            StoryEvent::AfterStory { .. } => "after-story",
            StoryEvent::StoryCancelled { .. } => "story-cancelled",
            StoryEvent::SubStepsStart => "sub-steps-start",
            StoryEvent::SubStepsFinish { .. } => "sub-steps-finish",
            StoryEvent::AttachmentPublished { .. } => "attachment-published",
            StoryEvent::LogEntry { .. } => "log-entry",
            StoryEvent::AssertionFailed { .. } => "assertion-failed",
            StoryEvent::LinkPublished { .. } => "link-published",
        }
    }
}
