// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derives report labels and tracking links from story and scenario
//! metadata.

use crate::config::LinkTemplates;
use crate::env;
use crate::errors::MissingRootSuiteError;
use crate::run_model::{Meta, Story};
use storyline_report::{Label, LabelName, Link, LinkType};

/// The framework label value attached to every test case.
pub const FRAMEWORK: &str = "storyline";

/// The group label fallback for stories without a group tag.
pub const UNGROUPED: &str = "Ungrouped";

/// The display title of a story: given stories are prefixed so nested
/// suites read distinctly.
pub fn story_title(story: &Story, given_story: bool) -> String {
    if given_story { format!("Given Story: {}", story.name) } else { story.name.clone() }
}

/// Builds the label set recorded for a starting story.
///
/// Given stories additionally inherit the root story's suite label as
/// their parent suite; the root story must have recorded one.
pub fn story_labels(
    story: &Story,
    given_story: bool,
    root_suite: Option<&str>,
) -> Result<Vec<Label>, MissingRootSuiteError> {
    let mut labels = vec![Label::new(LabelName::Suite, story_title(story, given_story))];
    if given_story {
        let suite = root_suite.ok_or(MissingRootSuiteError)?;
        labels.push(Label::new(LabelName::ParentSuite, suite));
    }
    labels.extend([
        Label::new(LabelName::Host, env::host_name()),
        Label::new(LabelName::Thread, env::thread_token()),
        Label::new(LabelName::Story, story.name.clone()),
        Label::new(LabelName::Group, story.meta.get("group").unwrap_or(UNGROUPED)),
        Label::new(LabelName::Framework, FRAMEWORK),
    ]);
    Ok(labels)
}

/// The closed set of metadata tags that produce labels and links.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetaTag {
    /// Numeric test tier, mapped to a severity label.
    TestTier,
    /// Free-form grouping values.
    TestCaseGroup,
    /// Test-management-system case ids.
    TestCaseId,
    /// Requirement ids.
    RequirementId,
}

impl MetaTag {
    /// All tags, in the order their labels are emitted.
    pub const ALL: [MetaTag; 4] =
        [MetaTag::TestTier, MetaTag::TestCaseGroup, MetaTag::TestCaseId, MetaTag::RequirementId];

    /// The metadata key this tag reads.
    pub fn key(self) -> &'static str {
        match self {
            MetaTag::TestTier => "testTier",
            MetaTag::TestCaseGroup => "testCaseGroup",
            MetaTag::TestCaseId => "testCaseId",
            MetaTag::RequirementId => "requirementId",
        }
    }

    /// The tracking-link type values of this tag resolve to, if any.
    pub fn link_type(self) -> Option<LinkType> {
        match self {
            MetaTag::TestTier | MetaTag::TestCaseGroup => None,
            MetaTag::TestCaseId => Some(LinkType::Tms),
            MetaTag::RequirementId => Some(LinkType::Requirement),
        }
    }
}

/// Builds the metadata-derived labels and links for a starting test case.
///
/// Values come from the union of story and scenario tags, split on `;`,
/// trimmed, and deduplicated preserving first-seen order. A value becomes
/// a link only when a template for its link type is configured.
pub fn meta_labels_and_links(
    story_meta: &Meta,
    scenario_meta: &Meta,
    templates: &LinkTemplates,
) -> (Vec<Label>, Vec<Link>) {
    let mut labels = Vec::new();
    let mut links = Vec::new();
    for tag in MetaTag::ALL {
        for value in tag_values(story_meta, scenario_meta, tag.key()) {
            match tag {
                MetaTag::TestTier => match severity_for(&value) {
                    Some(severity) => labels.push(Label::new(LabelName::Severity, severity)),
                    None => {
                        tracing::warn!(value = %value, "ignoring invalid test tier");
                    }
                },
                _ => {
                    labels.push(Label::new(tag.key(), value.clone()));
                    if let Some(link_type) = tag.link_type() {
                        if let Some(url) = templates.url(link_type, &value) {
                            links.push(Link::new(value, Some(url), link_type));
                        }
                    }
                }
            }
        }
    }
    (labels, links)
}

fn tag_values(story_meta: &Meta, scenario_meta: &Meta, key: &str) -> Vec<String> {
    let mut values = Vec::new();
    for meta in [story_meta, scenario_meta] {
        let Some(raw) = meta.get(key) else { continue };
        for value in raw.split(';') {
            let value = value.trim();
            if !value.is_empty() && !values.iter().any(|known| known == value) {
                values.push(value.to_owned());
            }
        }
    }
    values
}

fn severity_for(tier: &str) -> Option<&'static str> {
    match tier.parse::<u8>().ok()? {
        1 => Some("blocker"),
        2 => Some("critical"),
        3 => Some("normal"),
        4 => Some("minor"),
        5 => Some("trivial"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn templates() -> LinkTemplates {
        LinkTemplates {
            tms: Some("https://tms.example.com/case/{}".into()),
            issue: None,
            requirement: Some("https://req.example.com/{}".into()),
        }
    }

    #[test]
    fn root_story_labels_carry_the_fixed_set() {
        let story = Story::new(
            "suites/checkout.story",
            Meta::from_pairs([("group", "Payments")]),
            0,
        );
        let labels = story_labels(&story, false, None).expect("root story needs no parent suite");
        let names: Vec<&str> = labels.iter().map(|label| label.name.as_str()).collect();
        assert_eq!(names, vec!["suite", "host", "thread", "story", "group", "framework"]);
        assert_eq!(labels[0].value, "checkout.story");
        assert_eq!(labels[4].value, "Payments");
        assert_eq!(labels[5].value, FRAMEWORK);
    }

    #[test]
    fn untagged_story_falls_into_the_default_group() {
        let story = Story::new("plain.story", Meta::new(), 0);
        let labels = story_labels(&story, false, None).expect("derivable");
        let group = labels.iter().find(|label| label.name == "group").expect("group label");
        assert_eq!(group.value, UNGROUPED);
    }

    #[test]
    fn given_story_inherits_the_root_suite() {
        let story = Story::new("nested/login.story", Meta::new(), 0);
        let labels = story_labels(&story, true, Some("checkout.story")).expect("derivable");
        assert_eq!(labels[0], Label::new(LabelName::Suite, "Given Story: login.story"));
        assert_eq!(labels[1], Label::new(LabelName::ParentSuite, "checkout.story"));

        assert_eq!(story_labels(&story, true, None), Err(MissingRootSuiteError));
    }

    #[test_case("1", Some("blocker"))]
    #[test_case("3", Some("normal"))]
    #[test_case("5", Some("trivial"))]
    #[test_case("0", None)]
    #[test_case("6", None)]
    #[test_case("high", None)]
    fn severity_table(tier: &str, expected: Option<&'static str>) {
        assert_eq!(severity_for(tier), expected);
    }

    #[test]
    fn invalid_test_tier_is_skipped() {
        let story_meta = Meta::from_pairs([("testTier", "high")]);
        let (labels, links) = meta_labels_and_links(&story_meta, &Meta::new(), &templates());
        assert!(labels.is_empty());
        assert!(links.is_empty());
    }

    #[test]
    fn multi_valued_tags_are_split_trimmed_and_deduplicated() {
        let story_meta = Meta::from_pairs([("testCaseId", "TC-1; TC-2")]);
        let scenario_meta = Meta::from_pairs([("testCaseId", "TC-2;TC-3 ; ;"), ("testTier", "2")]);
        let (labels, links) = meta_labels_and_links(&story_meta, &scenario_meta, &templates());

        assert_eq!(
            labels,
            vec![
                Label::new(LabelName::Severity, "critical"),
                Label::new("testCaseId", "TC-1"),
                Label::new("testCaseId", "TC-2"),
                Label::new("testCaseId", "TC-3"),
            ]
        );
        let urls: Vec<Option<&str>> = links.iter().map(|link| link.url.as_deref()).collect();
        assert_eq!(
            urls,
            vec![
                Some("https://tms.example.com/case/TC-1"),
                Some("https://tms.example.com/case/TC-2"),
                Some("https://tms.example.com/case/TC-3"),
            ]
        );
    }

    #[test]
    fn links_require_a_configured_template() {
        let scenario_meta = Meta::from_pairs([("testCaseId", "TC-9")]);
        let (labels, links) =
            meta_labels_and_links(&Meta::new(), &scenario_meta, &LinkTemplates::default());
        assert_eq!(labels, vec![Label::new("testCaseId", "TC-9")]);
        assert!(links.is_empty());
    }

    #[test]
    fn group_values_label_without_linking() {
        let scenario_meta = Meta::from_pairs([("testCaseGroup", "smoke;regression")]);
        let (labels, links) = meta_labels_and_links(&Meta::new(), &scenario_meta, &templates());
        assert_eq!(
            labels,
            vec![
                Label::new("testCaseGroup", "smoke"),
                Label::new("testCaseGroup", "regression"),
            ]
        );
        assert!(links.is_empty());
    }
}
