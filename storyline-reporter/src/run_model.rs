// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine-side value types carried by lifecycle events.

use indexmap::IndexMap;
use uuid::Uuid;

/// Ordered metadata tags attached to a story or scenario.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Meta {
    tags: IndexMap<String, String>,
}

impl Meta {
    /// Creates an empty tag map.
    pub fn new() -> Self {
        Meta::default()
    }

    /// Creates a tag map from key/value pairs, preserving their order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Meta { tags: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Adds or replaces a tag.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(name.into(), value.into());
    }

    /// The value of a tag.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    /// True when the tag is present.
    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// True when no tags are present.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates over tags in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// A story as the run engine describes it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Story {
    /// Source path of the story, unique within the run.
    pub path: String,
    /// Story name: the last segment of the path.
    pub name: String,
    /// Story-level metadata tags.
    pub meta: Meta,
    /// Number of example rows in the story-level lifecycle table.
    pub lifecycle_row_count: usize,
    /// False when the story was filtered out upstream; such stories are
    /// not reported at all.
    pub allowed: bool,
}

impl Story {
    /// Creates a story, deriving its name from the last path segment.
    pub fn new(path: impl Into<String>, meta: Meta, lifecycle_row_count: usize) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_owned();
        Story { path, name, meta, lifecycle_row_count, allowed: true }
    }

    /// Marks the story as filtered out.
    pub fn excluded(mut self) -> Self {
        self.allowed = false;
        self
    }
}

/// A scenario as the run engine describes it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Scenario {
    /// Engine-assigned id, unique within the run.
    pub id: String,
    /// Resolved scenario title.
    pub title: String,
    /// Scenario-level metadata tags.
    pub meta: Meta,
    /// Number of example rows driving this scenario.
    pub example_row_count: usize,
    /// True when the scenario's given stories consume the example rows
    /// themselves, leaving a single test case for the scenario.
    pub given_stories_require_parameters: bool,
}

impl Scenario {
    /// Creates a scenario.
    pub fn new(id: impl Into<String>, title: impl Into<String>, meta: Meta) -> Self {
        Scenario {
            id: id.into(),
            title: title.into(),
            meta,
            example_row_count: 0,
            given_stories_require_parameters: false,
        }
    }

    /// Sets the example-row count.
    pub fn with_example_rows(mut self, rows: usize) -> Self {
        self.example_row_count = rows;
        self
    }

    /// Marks the given stories as consuming the example rows.
    pub fn with_parameterized_given_stories(mut self) -> Self {
        self.given_stories_require_parameters = true;
        self
    }

    /// Creates the stand-in scenario behind a synthetic lifecycle test
    /// case, which has no engine-side counterpart.
    pub fn synthetic(title: impl Into<String>) -> Self {
        Scenario::new(Uuid::new_v4().to_string(), title, Meta::new())
    }
}

/// One scenario execution within a running story.
#[derive(Clone, Debug)]
pub struct RunningScenario {
    /// The scenario being executed.
    pub scenario: Scenario,
    /// Resolved display title.
    pub title: String,
    /// The current example-row index for data-driven scenarios.
    pub row_index: Option<usize>,
}

impl RunningScenario {
    /// Starts tracking a scenario execution.
    pub fn new(scenario: Scenario) -> Self {
        let title = scenario.title.clone();
        RunningScenario { scenario, title, row_index: None }
    }
}

/// One story being executed on this thread, with the bookkeeping the
/// translator needs until the story ends.
#[derive(Clone, Debug)]
pub struct RunningStory {
    /// The story being executed.
    pub story: Story,
    /// Titles of scenarios that already completed in this story, used to
    /// disambiguate history ids of same-titled scenarios.
    pub ran_titles: Vec<String>,
    /// The scenario currently executing, if any.
    pub current_scenario: Option<RunningScenario>,
}

impl RunningStory {
    /// Starts tracking a story execution.
    pub fn new(story: Story) -> Self {
        RunningStory { story, ran_titles: Vec::new(), current_scenario: None }
    }

    /// True when the story passed upstream filtering.
    pub fn allowed(&self) -> bool {
        self.story.allowed
    }
}
