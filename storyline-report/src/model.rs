// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The report node model: test cases, steps, and their metadata.

use crate::status::{PENDING_STEP_MARKER, Status};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Identifier of a report node.
///
/// Test-case ids are derived from the scenario's engine-assigned id plus an
/// optional example-row suffix; step ids chain the parent id with a
/// per-thread token. Virtual steps injected outside the step protocol (log
/// entries) use random ids.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a node id from a raw string.
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// Creates the id of a test case for a scenario execution.
    ///
    /// `row_index` is present for data-driven scenarios and yields one id
    /// per example row: `scenario-id[N]`.
    pub fn test_case(scenario_id: &str, row_index: Option<usize>) -> Self {
        match row_index {
            Some(index) => NodeId(format!("{scenario_id}[{index}]")),
            None => NodeId(scenario_id.to_owned()),
        }
    }

    /// Creates the id of a child step opened under this node.
    ///
    /// The token is stable per thread, so a thread can hold at most one open
    /// child of a given parent at a time.
    pub fn child(&self, token: &str) -> Self {
        NodeId(format!("{}-{}", self.0, token))
    }

    /// Creates a random node id, used for virtual steps that bypass the
    /// parent-child id chain.
    pub fn random() -> Self {
        NodeId(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

/// Well-known label names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LabelName {
    /// The suite grouping a story's test cases, named after the story title.
    Suite,
    /// The suite of the root story, attached to given-story test cases.
    ParentSuite,
    /// The host the story ran on.
    Host,
    /// The logical thread the story ran on.
    Thread,
    /// The story name.
    Story,
    /// The story's group tag.
    Group,
    /// The reporting framework.
    Framework,
    /// Severity derived from the test-tier tag.
    Severity,
}

impl LabelName {
    /// Returns the serialized name of this label.
    pub fn as_str(self) -> &'static str {
        match self {
            LabelName::Suite => "suite",
            LabelName::ParentSuite => "parentSuite",
            LabelName::Host => "host",
            LabelName::Thread => "thread",
            LabelName::Story => "story",
            LabelName::Group => "group",
            LabelName::Framework => "framework",
            LabelName::Severity => "severity",
        }
    }
}

impl fmt::Display for LabelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LabelName> for String {
    fn from(name: LabelName) -> Self {
        name.as_str().to_owned()
    }
}

/// A name/value label attached to a test case. Duplicates are allowed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Label {
    /// The label name.
    pub name: String,
    /// The label value.
    pub value: String,
}

impl Label {
    /// Creates a new label.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Label { name: name.into(), value: value.into() }
    }
}

/// The kind of a tracking link.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// A test-management-system link.
    Tms,
    /// An issue-tracker link.
    Issue,
    /// A requirement link.
    Requirement,
    /// Any other link published during the run.
    Custom,
}

/// A tracking link attached to a test case.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Link {
    /// Display name, typically the tracked identifier.
    pub name: String,
    /// Resolved URL, absent when no link template matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The link kind.
    #[serde(rename = "type")]
    pub link_type: LinkType,
}

impl Link {
    /// Creates a new link.
    pub fn new(name: impl Into<String>, url: Option<String>, link_type: LinkType) -> Self {
        Link { name: name.into(), url, link_type }
    }
}

/// A name/value parameter attached to a node, typically an example-row
/// column.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Parameter {
    /// The parameter name.
    pub name: String,
    /// The parameter value.
    pub value: String,
}

impl Parameter {
    /// Creates a new parameter.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Parameter { name: name.into(), value: value.into() }
    }
}

/// A reference to attachment content persisted by the results writer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Attachment {
    /// Display name.
    pub name: String,
    /// File name of the persisted content, relative to the results
    /// directory.
    pub source: String,
    /// MIME type of the content.
    #[serde(rename = "type")]
    pub content_type: String,
}

impl Attachment {
    /// Creates a new attachment reference.
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Attachment { name: name.into(), source: source.into(), content_type: content_type.into() }
    }
}

/// Detail accompanying a node's status.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StatusDetail {
    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Stack trace or equivalent diagnostic text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
    /// True for details that should not surface in summaries, e.g. debug
    /// log steps.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub muted: bool,
}

impl StatusDetail {
    /// Creates a detail with just a message.
    pub fn message(message: impl Into<String>) -> Self {
        StatusDetail { message: Some(message.into()), trace: None, muted: false }
    }

    /// Creates a muted detail.
    pub fn muted() -> Self {
        StatusDetail { message: None, trace: None, muted: true }
    }

    /// Sets the trace.
    pub fn set_trace(&mut self, trace: impl Into<String>) -> &mut Self {
        self.trace = Some(trace.into());
        self
    }
}

/// A non-root report node: one step execution, possibly holding nested
/// steps.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct StepResult {
    /// The step id.
    pub id: NodeId,
    /// Display name. Renamed to the final step text when the step closes.
    pub name: String,
    /// Current status. Starts at [`Status::lowest`].
    pub status: Status,
    /// Optional status detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<StatusDetail>,
    /// Example-row parameters attached to this step.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Finalized child steps, in completion order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepResult>,
    /// Attachments published while this step was current.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Start timestamp, stamped when the step opens.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub start: Option<DateTime<Utc>>,
    /// Stop timestamp, stamped when the step closes.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub stop: Option<DateTime<Utc>>,
}

impl StepResult {
    /// Creates a new step with the lowest-priority status.
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        StepResult {
            id,
            name: name.into(),
            status: Status::lowest(),
            status_detail: None,
            parameters: Vec::new(),
            steps: Vec::new(),
            attachments: Vec::new(),
            start: None,
            stop: None,
        }
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Sets the status unconditionally. Prefer [`StepResult::record_status`]
    /// for merge semantics.
    pub fn set_status(&mut self, status: Status) -> &mut Self {
        self.status = status;
        self
    }

    /// Sets the status detail.
    pub fn set_status_detail(&mut self, detail: StatusDetail) -> &mut Self {
        self.status_detail = Some(detail);
        self
    }

    /// Adds a parameter.
    pub fn add_parameter(&mut self, parameter: Parameter) -> &mut Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds a finalized child step.
    pub fn add_step(&mut self, step: StepResult) -> &mut Self {
        self.steps.push(step);
        self
    }

    /// Adds an attachment reference.
    pub fn add_attachment(&mut self, attachment: Attachment) -> &mut Self {
        self.attachments.push(attachment);
        self
    }

    /// The status this step currently ranks at for merge comparisons.
    pub fn effective_status(&self) -> Status {
        effective_status(self.status, self.status_detail.as_ref())
    }

    /// Applies `candidate` if it outranks the current status. Returns true
    /// if the status changed.
    pub fn record_status(&mut self, candidate: Status) -> bool {
        if candidate.overwrites(self.effective_status()) {
            self.status = candidate;
            true
        } else {
            false
        }
    }
}

/// The root report node for one scenario execution.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct TestCaseResult {
    /// The test case id.
    pub id: NodeId,
    /// Identity fingerprint for matching this test case across runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_id: Option<String>,
    /// Display name, the scenario title.
    pub name: String,
    /// Current status. Starts at [`Status::lowest`].
    pub status: Status,
    /// Optional status detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_detail: Option<StatusDetail>,
    /// Labels, in insertion order. Duplicates are allowed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Tracking links, in insertion order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    /// Example-row parameters attached to this test case.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Finalized child steps, in completion order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepResult>,
    /// Attachments published while the test case itself was current.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// Start timestamp, stamped when the test case starts.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub start: Option<DateTime<Utc>>,
    /// Stop timestamp, stamped when the test case stops.
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub stop: Option<DateTime<Utc>>,
}

impl TestCaseResult {
    /// Creates a new test case with the lowest-priority status.
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        TestCaseResult {
            id,
            history_id: None,
            name: name.into(),
            status: Status::lowest(),
            status_detail: None,
            labels: Vec::new(),
            links: Vec::new(),
            parameters: Vec::new(),
            steps: Vec::new(),
            attachments: Vec::new(),
            start: None,
            stop: None,
        }
    }

    /// Sets the history id.
    pub fn set_history_id(&mut self, history_id: impl Into<String>) -> &mut Self {
        self.history_id = Some(history_id.into());
        self
    }

    /// Adds a label.
    pub fn add_label(&mut self, label: Label) -> &mut Self {
        self.labels.push(label);
        self
    }

    /// Adds labels in order.
    pub fn add_labels(&mut self, labels: impl IntoIterator<Item = Label>) -> &mut Self {
        self.labels.extend(labels);
        self
    }

    /// Adds a link.
    pub fn add_link(&mut self, link: Link) -> &mut Self {
        self.links.push(link);
        self
    }

    /// Adds a link unless one with the same name and URL is already
    /// present. Returns true if the link was added.
    pub fn add_unique_link(&mut self, link: Link) -> bool {
        let exists =
            self.links.iter().any(|known| known.url == link.url && known.name == link.name);
        if !exists {
            self.links.push(link);
        }
        !exists
    }

    /// Adds a parameter.
    pub fn add_parameter(&mut self, parameter: Parameter) -> &mut Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds a finalized child step.
    pub fn add_step(&mut self, step: StepResult) -> &mut Self {
        self.steps.push(step);
        self
    }

    /// Adds an attachment reference.
    pub fn add_attachment(&mut self, attachment: Attachment) -> &mut Self {
        self.attachments.push(attachment);
        self
    }

    /// The status this test case currently ranks at for merge comparisons.
    ///
    /// A skipped test case whose detail carries the pending marker ranks as
    /// [`Status::Pending`].
    pub fn effective_status(&self) -> Status {
        effective_status(self.status, self.status_detail.as_ref())
    }

    /// Applies `candidate` and its detail if `candidate` outranks the
    /// current status.
    ///
    /// When the status is not overwritten, the detail is still recorded if
    /// the test case had none yet. Returns true if the status changed.
    pub fn record_status(&mut self, candidate: Status, detail: Option<StatusDetail>) -> bool {
        if candidate.overwrites(self.effective_status()) {
            self.status = candidate;
            self.status_detail = detail;
            true
        } else {
            if self.status_detail.is_none() {
                self.status_detail = detail;
            }
            false
        }
    }
}

fn effective_status(status: Status, detail: Option<&StatusDetail>) -> Status {
    match detail {
        Some(detail) if detail.message.as_deref() == Some(PENDING_STEP_MARKER) => Status::Pending,
        _ => status,
    }
}
