// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporter configuration.
//!
//! Configuration is read from a TOML file with kebab-case keys:
//!
//! ```toml
//! results-dir = "build/storyline-results"
//! clean-results-dir = false
//! test-run-id = "run-42"
//!
//! [link-templates]
//! issue = "https://issues.example.com/browse/{}"
//! tms = "https://tms.example.com/case/{}"
//! ```

use crate::errors::ConfigReadError;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use storyline_report::LinkType;

/// URL templates for tracking links, one per resolvable link type.
///
/// A template contains a `{}` placeholder replaced with the tracked
/// identifier. An unset template suppresses links of that type.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct LinkTemplates {
    /// Template for test-management-system links.
    pub tms: Option<String>,
    /// Template for issue-tracker links.
    pub issue: Option<String>,
    /// Template for requirement links.
    pub requirement: Option<String>,
}

impl LinkTemplates {
    /// Resolves the URL for a tracked identifier, if a template for the
    /// link type is configured. Custom links carry their own URLs and
    /// never resolve through templates.
    pub fn url(&self, link_type: LinkType, id: &str) -> Option<String> {
        let template = match link_type {
            LinkType::Tms => self.tms.as_deref(),
            LinkType::Issue => self.issue.as_deref(),
            LinkType::Requirement => self.requirement.as_deref(),
            LinkType::Custom => None,
        }?;
        Some(template.replace("{}", id))
    }
}

/// Deserialized reporter configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReporterConfig {
    /// Directory test case results and attachments are written to.
    pub results_dir: Utf8PathBuf,
    /// Whether the results directory is wiped when the run session opens.
    pub clean_results_dir: bool,
    /// URL templates for tracking links.
    pub link_templates: LinkTemplates,
    /// External test run id, linked on every closing root test case when
    /// set.
    pub test_run_id: Option<String>,
    /// Dry-run mode: nested given stories are not reported as steps.
    pub dry_run: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        ReporterConfig {
            results_dir: Utf8PathBuf::from("storyline-results"),
            clean_results_dir: true,
            link_templates: LinkTemplates::default(),
            test_run_id: None,
            dry_run: false,
        }
    }
}

impl ReporterConfig {
    /// Reads configuration from a TOML file, filling unset keys with
    /// defaults.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigReadError> {
        let source = config::File::from(path.as_std_path()).format(config::FileFormat::Toml);
        let settings = config::Config::builder()
            .add_source(source)
            .build()
            .map_err(|error| ConfigReadError { path: path.to_owned(), error })?;
        settings
            .try_deserialize()
            .map_err(|error| ConfigReadError { path: path.to_owned(), error })
    }

    /// Resolves the URL for a tracked identifier through the configured
    /// templates.
    pub fn link_url(&self, link_type: LinkType, id: &str) -> Option<String> {
        self.link_templates.url(link_type, id)
    }
}
