// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lifecycle-to-report translator.
//!
//! [`StoryReporter`] consumes the ordered [`StoryEvent`] stream of a run
//! engine and drives a [`ReportBackend`] so that every scenario execution
//! becomes one written test case, with steps nested exactly as they ran.
//! All bookkeeping is per thread: the execution path of open nodes, the
//! story stack, and the stage records that decide when synthetic lifecycle
//! test cases and `@BeforeScenario`/`@AfterScenario` bracket steps are
//! woven in.

use crate::config::ReporterConfig;
use crate::context::{ContextStore, ThreadState};
use crate::env;
use crate::errors::{NoActiveStoryError, ReportEventError};
use crate::events::{LogLevel, StoryEvent};
use crate::failure::{DefaultClassifier, Failure, FailureKind, StatusClassifier};
use crate::labels;
use crate::reporter::RunListener;
use crate::run_model::{RunningScenario, RunningStory, Scenario, Story};
use crate::stage::{ScenarioStage, StoryStage};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use storyline_report::{
    DirectorySession, JsonResultsWriter, Link, LinkType, NodeId, PENDING_STEP_MARKER, Parameter,
    ReportBackend, ReportSession, ReportStore, Status, StatusDetail, StepResult, TestCaseResult,
};

/// Title of the synthetic test case holding before-story lifecycle steps.
const BEFORE_STORY_LIFECYCLE: &str = "Lifecycle: Before story";
/// Title of the synthetic test case holding after-story lifecycle steps.
const AFTER_STORY_LIFECYCLE: &str = "Lifecycle: After story";
/// Title of the synthesized step bracketing before-scenario hook output.
const BEFORE_SCENARIO_HOOK: &str = "@BeforeScenario";
/// Title of the synthesized step bracketing after-scenario hook output.
const AFTER_SCENARIO_HOOK: &str = "@AfterScenario";

/// Reserved pseudo-story opening the run session.
const BEFORE_STORIES: &str = "BeforeStories";
/// Reserved pseudo-story flushing the run session.
const AFTER_STORIES: &str = "AfterStories";
/// Reserved pseudo-story flushing the session after an aborted run.
const ABORTED_STORIES: &str = "AbortedStories";

/// Detail message recorded for commented-out steps.
const COMMENTED_DETAIL: &str = "The step is commented";
/// Detail message recorded for steps skipped after an earlier failure.
const NOT_PERFORMED_DETAIL: &str = "The step is not performed";

/// Display name of the external test run link.
const TEST_RUN_LINK_NAME: &str = "Test run ID";

/// Translates run-engine lifecycle events into report-tree operations.
///
/// One `StoryReporter` serves the whole run; it keeps independent state per
/// worker thread, so stories running in parallel never see each other's
/// open nodes. Events for one story must arrive in protocol order on the
/// thread that owns it.
pub struct StoryReporter {
    backend: Arc<dyn ReportBackend>,
    session: Arc<dyn ReportSession>,
    classifier: Box<dyn StatusClassifier>,
    config: ReporterConfig,
    context: ContextStore<ThreadState>,
}

impl StoryReporter {
    /// Creates a reporter with the standard failure classification.
    pub fn new(
        backend: Arc<dyn ReportBackend>,
        session: Arc<dyn ReportSession>,
        config: ReporterConfig,
    ) -> Self {
        Self::with_classifier(backend, session, config, Box::new(DefaultClassifier))
    }

    /// Creates a reporter with a custom failure classifier.
    pub fn with_classifier(
        backend: Arc<dyn ReportBackend>,
        session: Arc<dyn ReportSession>,
        config: ReporterConfig,
        classifier: Box<dyn StatusClassifier>,
    ) -> Self {
        StoryReporter { backend, session, classifier, config, context: ContextStore::new() }
    }

    /// Creates a reporter writing JSON results to the configured directory.
    pub fn from_config(config: ReporterConfig) -> Self {
        let writer = Arc::new(JsonResultsWriter::new(config.results_dir.clone()));
        let backend = Arc::new(ReportStore::new(writer));
        let session =
            Arc::new(DirectorySession::new(config.results_dir.clone(), config.clean_results_dir));
        Self::new(backend, session, config)
    }

    fn dispatch(
        &self,
        state: &mut ThreadState,
        event: &StoryEvent,
    ) -> Result<(), ReportEventError> {
        match event {
            StoryEvent::BeforeStory { story, given_story } => {
                self.before_story(state, story, *given_story)
            }
            StoryEvent::BeforeScenario { scenario } => self.before_scenario(state, scenario),
            StoryEvent::Example { row, index } => self.example(state, row, *index),
            StoryEvent::BeforeStep { text } => self.start_step(state, text, true),
            StoryEvent::Successful { text } => self.successful(state, text),
            StoryEvent::Ignorable { .. } => self.skip_step(state, COMMENTED_DETAIL),
            StoryEvent::Pending { .. } => self.skip_step(state, PENDING_STEP_MARKER),
            StoryEvent::NotPerformed { .. } => self.skip_step(state, NOT_PERFORMED_DETAIL),
            StoryEvent::Comment { .. } => self.comment(state),
            StoryEvent::Failed { text, failure } => self.failed(state, text, failure),
            StoryEvent::AfterScenario => self.after_scenario(state),
            StoryEvent::AfterStory { given_story } => self.after_story(state, *given_story),
            StoryEvent::StoryCancelled { story, duration_secs } => {
                self.story_cancelled(state, story, *duration_secs)
            }
            StoryEvent::SubStepsStart => self.start_step(state, "", true),
            StoryEvent::SubStepsFinish { title, failure } => {
                self.sub_steps_finish(state, title, failure.as_ref())
            }
            StoryEvent::AttachmentPublished { title, content_type, content } => {
                self.attachment_published(state, title, content_type, content)
            }
            StoryEvent::LogEntry { level, text } => self.log_entry(state, *level, text),
            StoryEvent::AssertionFailed { failure } => self.assertion_failed(state, failure),
            StoryEvent::LinkPublished { name, url } => self.link_published(state, name, url),
        }
    }

    fn before_story(
        &self,
        state: &mut ThreadState,
        story: &Story,
        given_story: bool,
    ) -> Result<(), ReportEventError> {
        state.stories.push(RunningStory::new(story.clone()));
        if !story.allowed {
            return Ok(());
        }
        state.stages.push_record();
        match story.name.as_str() {
            BEFORE_STORIES => self.session.open()?,
            AFTER_STORIES | ABORTED_STORIES => self.session.flush()?,
            _ => {
                let title = labels::story_title(story, given_story);
                if !self.config.dry_run && !state.path.is_empty() {
                    // A given story nested under an open node becomes a
                    // step; it still gets a label set so that the pops at
                    // after-story stay symmetric.
                    state.stages.push_label_set(given_story);
                    self.start_step(state, &title, false)?;
                } else {
                    let story_labels =
                        labels::story_labels(story, given_story, state.stages.root_suite())?;
                    state.stages.push_label_set(given_story).extend(story_labels);
                }
            }
        }
        Ok(())
    }

    fn before_scenario(
        &self,
        state: &mut ThreadState,
        scenario: &Scenario,
    ) -> Result<(), ReportEventError> {
        // A synthetic before-story lifecycle test case stays open until the
        // first real scenario announces itself.
        if state.stages.story_stage() == Some(StoryStage::BeforeLifecycleSteps) {
            self.close_test_case(state)?;
        }
        let running = RunningScenario::new(scenario.clone());
        let lifecycle_rows = state.current_story()?.story.lifecycle_row_count;
        state.current_story_mut()?.current_scenario = Some(running.clone());
        let opens_here = (scenario.example_row_count == 0
            || scenario.given_stories_require_parameters)
            && lifecycle_rows == 0;
        if opens_here {
            self.start_test_case(state, running, StoryStage::BeforeScenario)?;
        }
        Ok(())
    }

    fn example(
        &self,
        state: &mut ThreadState,
        row: &IndexMap<String, String>,
        index: usize,
    ) -> Result<(), ReportEventError> {
        if index > 0 {
            self.close_test_case(state)?;
        }
        let was_open = state.path.head().is_some();
        let (running, parameters) = {
            let story = state.current_story_mut()?;
            let current = story.current_scenario.as_mut().ok_or(NoActiveStoryError)?;
            current.row_index = Some(index);
            let parameters: Vec<Parameter> = row
                .iter()
                .filter(|(key, _)| {
                    !story.story.meta.contains(key) && !current.scenario.meta.contains(key)
                })
                .map(|(key, value)| Parameter::new(key.as_str(), value.as_str()))
                .collect();
            (current.clone(), parameters)
        };
        self.start_test_case(state, running, StoryStage::BeforeScenario)?;
        let target = state.path.head().expect("start_test_case opened a node").clone();
        if was_open {
            // The row opened a step, not a test case: the scenario runs
            // nested in a given story, or its test case opened early
            // because its given stories consume the row parameters.
            self.backend.update_step(&target, &mut |step| {
                for parameter in &parameters {
                    step.add_parameter(parameter.clone());
                }
            })?;
        } else {
            self.backend.update_test_case(&target, &mut |test_case| {
                for parameter in &parameters {
                    test_case.add_parameter(parameter.clone());
                }
            })?;
        }
        Ok(())
    }

    /// Opens a step under the current node, or the test case itself when
    /// none is open yet.
    ///
    /// With `check_lifecycle` set, a step arriving outside any test case is
    /// recognized as story lifecycle and wrapped in a synthetic test case
    /// first; given stories reported as steps pass `false`, since a fresh
    /// stage record can never mean lifecycle.
    fn start_step(
        &self,
        state: &mut ThreadState,
        title: &str,
        check_lifecycle: bool,
    ) -> Result<(), ReportEventError> {
        if check_lifecycle {
            match state.stages.story_stage() {
                None => {
                    let scenario = Scenario::synthetic(BEFORE_STORY_LIFECYCLE);
                    self.start_test_case(
                        state,
                        RunningScenario::new(scenario),
                        StoryStage::BeforeLifecycleSteps,
                    )?;
                }
                Some(StoryStage::AfterScenario) => {
                    let scenario = Scenario::synthetic(AFTER_STORY_LIFECYCLE);
                    self.start_test_case(
                        state,
                        RunningScenario::new(scenario),
                        StoryStage::AfterLifecycleSteps,
                    )?;
                }
                _ => {}
            }
        }
        let parent = state
            .path
            .head()
            .ok_or(ReportEventError::NoCurrentNode { operation: "step start" })?
            .clone();
        let id = parent.child(&env::thread_token());
        self.backend.start_step(&parent, &id, StepResult::new(id.clone(), title))?;
        state.path = state.path.push(id);
        state.stages.set_step_in_progress(true);
        state.stages.set_scenario_stage(ScenarioStage::InProgress)?;
        Ok(())
    }

    fn successful(&self, state: &mut ThreadState, text: &str) -> Result<(), ReportEventError> {
        self.rename_current_step(state, text)?;
        self.stop_step_with(state, Status::Passed, None)
    }

    fn skip_step(&self, state: &mut ThreadState, message: &str) -> Result<(), ReportEventError> {
        self.stop_step_with(state, Status::Skipped, Some(StatusDetail::message(message)))
    }

    fn comment(&self, state: &mut ThreadState) -> Result<(), ReportEventError> {
        let head = state
            .path
            .head()
            .ok_or(ReportEventError::NoCurrentNode { operation: "comment" })?
            .clone();
        if state.path.is_root() {
            tracing::debug!(id = %head, "comment arrived with no open step");
            return Ok(());
        }
        // Only the comment step itself turns skipped; comments never taint
        // the enclosing nodes.
        self.backend.update_step(&head, &mut |step| {
            step.record_status(Status::Skipped);
        })?;
        self.stop_current_step(state)?;
        state.stages.set_scenario_stage(ScenarioStage::AfterSteps)?;
        Ok(())
    }

    fn failed(
        &self,
        state: &mut ThreadState,
        text: &str,
        failure: &Failure,
    ) -> Result<(), ReportEventError> {
        self.check_scenario_brackets(state)?;
        let head = state
            .path
            .head()
            .ok_or(ReportEventError::NoCurrentNode { operation: "step failure" })?
            .clone();
        if !failure.is_hook_failure() {
            self.backend.update_step(&head, &mut |step| {
                step.set_name(text);
            })?;
        }
        let cause = failure.unwrap_cause();
        if let FailureKind::Verification { known_issues, .. } = &cause.kind {
            let root = state.path.root().expect("path is non-empty").clone();
            let links: Vec<Link> = known_issues
                .iter()
                .filter(|issue| !issue.potentially_known)
                .map(|issue| {
                    Link::new(
                        issue.identifier.clone(),
                        self.config.link_url(LinkType::Issue, &issue.identifier),
                        LinkType::Issue,
                    )
                })
                .collect();
            self.backend.update_test_case(&root, &mut |test_case| {
                for link in &links {
                    test_case.add_link(link.clone());
                }
            })?;
        }
        let status = self.classifier.classify(cause);
        self.stop_step_with(state, status, Some(cause.status_detail()))
    }

    fn after_scenario(&self, state: &mut ThreadState) -> Result<(), ReportEventError> {
        self.close_test_case(state)?;
        state.stages.set_story_stage(StoryStage::AfterScenario)?;
        let story = state.current_story_mut()?;
        if let Some(finished) = story.current_scenario.take() {
            story.ran_titles.push(finished.scenario.title);
        }
        Ok(())
    }

    fn after_story(
        &self,
        state: &mut ThreadState,
        given_story: bool,
    ) -> Result<(), ReportEventError> {
        if state.current_story()?.allowed() {
            if state.stages.story_stage() == Some(StoryStage::AfterLifecycleSteps) {
                self.close_test_case(state)?;
            }
            if !state.path.is_empty() {
                if !state.path.is_root() {
                    // The given story reported as a step is still open;
                    // its final status comes from its own scenarios.
                    let head = state.path.head().expect("checked non-empty").clone();
                    self.backend.update_step(&head, &mut |step| {
                        step.record_status(Status::Passed);
                    })?;
                    self.stop_current_step(state)?;
                } else if !given_story {
                    // A test case left open through the story end, e.g. a
                    // lifecycle case that never saw an after-story step. A
                    // given story leaves a root node alone: in dry runs
                    // that node is the enclosing scenario's test case.
                    self.close_test_case(state)?;
                }
            }
            state.stages.pop_label_set(given_story);
            state.stages.pop_record()?;
        }
        state.stories.pop();
        Ok(())
    }

    fn story_cancelled(
        &self,
        state: &mut ThreadState,
        story: &Story,
        duration_secs: u64,
    ) -> Result<(), ReportEventError> {
        let detail = StatusDetail::message(env::timeout_message(duration_secs));
        if state.path.is_empty() {
            tracing::debug!(path = %story.path, "cancelled story had no open node");
        } else {
            while !state.path.is_root() {
                self.stop_step_with(state, Status::Broken, Some(detail.clone()))?;
            }
            let root = state.path.head().expect("path is at its root").clone();
            self.backend.update_test_case(&root, &mut |test_case| {
                test_case.record_status(Status::Broken, Some(detail.clone()));
            })?;
            self.close_test_case(state)?;
        }
        // The engine delivers nothing further for this story; drop all
        // bookkeeping so the thread starts its next story clean.
        *state = ThreadState::default();
        Ok(())
    }

    fn sub_steps_finish(
        &self,
        state: &mut ThreadState,
        title: &str,
        failure: Option<&Failure>,
    ) -> Result<(), ReportEventError> {
        self.rename_current_step(state, title)?;
        match failure {
            None => self.stop_step_with(state, Status::Passed, None),
            Some(failure) => {
                let cause = failure.unwrap_cause();
                let status = self.classifier.classify(cause);
                self.stop_step_with(state, status, Some(cause.status_detail()))
            }
        }
    }

    fn attachment_published(
        &self,
        state: &mut ThreadState,
        title: &str,
        content_type: &str,
        content: &[u8],
    ) -> Result<(), ReportEventError> {
        let node = state
            .path
            .head()
            .ok_or(ReportEventError::NoCurrentNode { operation: "attachment" })?
            .clone();
        self.backend.add_attachment(&node, title, content_type, content)?;
        Ok(())
    }

    fn log_entry(
        &self,
        state: &mut ThreadState,
        level: LogLevel,
        text: &str,
    ) -> Result<(), ReportEventError> {
        self.check_scenario_brackets(state)?;
        let Some(parent) = state.path.head().cloned() else {
            // Logs outside any node have nowhere to land; drop them.
            return Ok(());
        };
        let id = NodeId::random();
        let mut log_step = StepResult::new(id.clone(), text);
        match level {
            LogLevel::Debug => {
                log_step.set_status_detail(StatusDetail::muted());
            }
            LogLevel::Error => {
                log_step.set_status(Status::Failed);
            }
            LogLevel::Info | LogLevel::Warn => {}
        }
        self.backend.start_step(&parent, &id, log_step)?;
        self.backend.stop_step(&id)?;
        Ok(())
    }

    fn assertion_failed(
        &self,
        state: &mut ThreadState,
        failure: &Failure,
    ) -> Result<(), ReportEventError> {
        let status = self.classifier.classify(failure.unwrap_cause());
        let mut open: Vec<NodeId> = state.path.iter().cloned().collect();
        // The root test case records the failure when the step closes.
        open.pop();
        for id in &open {
            self.backend.update_step(id, &mut |step| {
                step.record_status(status);
            })?;
        }
        Ok(())
    }

    fn link_published(
        &self,
        state: &mut ThreadState,
        name: &str,
        url: &str,
    ) -> Result<(), ReportEventError> {
        let root = state
            .path
            .root()
            .ok_or(ReportEventError::NoCurrentNode { operation: "link publish" })?
            .clone();
        let link = Link::new(name, Some(url.to_owned()), LinkType::Custom);
        self.backend.update_test_case(&root, &mut |test_case| {
            test_case.add_unique_link(link.clone());
        })?;
        Ok(())
    }

    /// Opens a test case for the scenario, or a step when a node is
    /// already open on this thread.
    fn start_test_case(
        &self,
        state: &mut ThreadState,
        running: RunningScenario,
        stage: StoryStage,
    ) -> Result<(), ReportEventError> {
        state.stages.set_story_stage(stage)?;
        if state.path.is_empty() {
            let (test_case, id) = {
                let story = state.current_story()?;
                let (meta_labels, links) = labels::meta_labels_and_links(
                    &story.story.meta,
                    &running.scenario.meta,
                    &self.config.link_templates,
                );
                let id = NodeId::test_case(&running.scenario.id, running.row_index);
                let mut test_case = TestCaseResult::new(id.clone(), running.title.as_str());
                test_case.set_history_id(history_id(
                    &state.stories,
                    &running.scenario.title,
                    &running.title,
                ));
                test_case.add_labels(meta_labels);
                test_case.add_labels(state.stages.current_labels().iter().cloned());
                for link in links {
                    test_case.add_link(link);
                }
                (test_case, id)
            };
            self.backend.schedule_test_case(test_case)?;
            self.backend.start_test_case(&id)?;
            state.path = state.path.push(id);
            state.stages.set_scenario_stage(ScenarioStage::BeforeSteps)?;
        } else {
            // The story stage was just set, so the lifecycle check cannot
            // recurse a second time.
            self.start_step(state, running.title.as_str(), true)?;
        }
        Ok(())
    }

    /// Closes the current test case, or just the current step when the
    /// path is still inside a given story reported as a step.
    fn close_test_case(&self, state: &mut ThreadState) -> Result<(), ReportEventError> {
        if state.stages.step_in_progress() {
            // A dangling bracket step, e.g. @AfterScenario output that
            // never saw a close.
            self.stop_step_with(state, Status::lowest(), None)?;
        }
        if state.path.head().is_none() {
            return Err(ReportEventError::NoCurrentNode { operation: "close test case" });
        }
        if !state.path.is_root() {
            self.stop_current_step(state)?;
            return Ok(());
        }
        let id = state.path.head().expect("path is at its root").clone();
        if let Some(test_run_id) = &self.config.test_run_id {
            let url = self.config.link_url(LinkType::Tms, test_run_id);
            let link = Link::new(TEST_RUN_LINK_NAME, url, LinkType::Tms);
            self.backend.update_test_case(&id, &mut |test_case| {
                test_case.add_link(link.clone());
            })?;
        }
        self.backend.stop_test_case(&id)?;
        self.backend.write_test_case(&id)?;
        state.stages.clear_scenario_stage()?;
        state.path = state.path.pop()?;
        Ok(())
    }

    /// Synthesizes a bracket step when hook output arrives outside any
    /// step body.
    fn check_scenario_brackets(&self, state: &mut ThreadState) -> Result<(), ReportEventError> {
        if state.stages.step_in_progress() {
            return Ok(());
        }
        match state.stages.scenario_stage() {
            Some(ScenarioStage::BeforeSteps) => {
                self.start_step(state, BEFORE_SCENARIO_HOOK, true)
            }
            Some(ScenarioStage::AfterSteps) if state.path.is_root() => {
                self.start_step(state, AFTER_SCENARIO_HOOK, true)
            }
            _ => Ok(()),
        }
    }

    /// Closes the current step, recording `status` on every open step of
    /// the path and folding `status` and `detail` into the root test case.
    fn stop_step_with(
        &self,
        state: &mut ThreadState,
        status: Status,
        detail: Option<StatusDetail>,
    ) -> Result<(), ReportEventError> {
        let mut open: Vec<NodeId> = state.path.iter().cloned().collect();
        // The root test case takes the detail separately, below.
        open.pop();
        for id in &open {
            self.backend.update_step(id, &mut |step| {
                step.record_status(status);
            })?;
        }
        self.stop_current_step(state)?;
        if let Some(root) = state.path.root() {
            let root = root.clone();
            self.backend.update_test_case(&root, &mut |test_case| {
                test_case.record_status(status, detail.clone());
            })?;
        }
        state.stages.set_scenario_stage(ScenarioStage::AfterSteps)?;
        Ok(())
    }

    fn stop_current_step(&self, state: &mut ThreadState) -> Result<(), ReportEventError> {
        let head = state
            .path
            .head()
            .ok_or(ReportEventError::NoCurrentNode { operation: "stop step" })?
            .clone();
        self.backend.stop_step(&head)?;
        state.path = state.path.pop()?;
        state.stages.set_step_in_progress(false);
        Ok(())
    }

    fn rename_current_step(
        &self,
        state: &mut ThreadState,
        title: &str,
    ) -> Result<(), ReportEventError> {
        let head = state
            .path
            .head()
            .ok_or(ReportEventError::NoCurrentNode { operation: "rename step" })?
            .clone();
        self.backend.update_step(&head, &mut |step| {
            step.set_name(title);
        })?;
        Ok(())
    }
}

impl RunListener for StoryReporter {
    fn handle_event(&self, event: &StoryEvent) -> Result<(), ReportEventError> {
        let mut state = self.context.take()?;
        let outcome = self.dispatch(&mut state, event);
        self.context.put(state)?;
        outcome
    }
}

impl fmt::Debug for StoryReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryReporter")
            .field("results_dir", &self.config.results_dir)
            .field("dry_run", &self.config.dry_run)
            .finish_non_exhaustive()
    }
}

/// The history id of a scenario execution, stable across runs so report
/// consumers can track one scenario over time.
///
/// Same-titled scenarios within one story are disambiguated with a counter
/// of raw titles already run; the resolved title keeps example parameters
/// visible.
fn history_id(stories: &[RunningStory], raw_title: &str, resolved_title: &str) -> String {
    let suite = stories.first().map_or("", |story| story.story.name.as_str());
    let chain: Vec<&str> = stories.iter().map(|story| story.story.path.as_str()).collect();
    let mut scenario = resolved_title.to_owned();
    let same_title = stories
        .last()
        .map_or(0, |story| story.ran_titles.iter().filter(|title| *title == raw_title).count());
    if same_title > 0 {
        scenario.push('-');
        scenario.push_str(&(same_title - 1).to_string());
    }
    format!("[suite: {suite}][stories-chain: {}][scenario: {scenario}]", chain.join(" > "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run_model::Meta;
    use pretty_assertions::assert_eq;

    fn running(path: &str) -> RunningStory {
        RunningStory::new(Story::new(path, Meta::new(), 0))
    }

    #[test]
    fn history_id_names_suite_chain_and_scenario() {
        let stories = vec![running("suites/payment/checkout.story")];
        assert_eq!(
            history_id(&stories, "Pay by card", "Pay by card"),
            "[suite: checkout.story][stories-chain: suites/payment/checkout.story]\
             [scenario: Pay by card]"
        );
    }

    #[test]
    fn history_id_chains_given_stories_root_first() {
        let stories = vec![running("outer.story"), running("nested/inner.story")];
        assert_eq!(
            history_id(&stories, "S", "S"),
            "[suite: outer.story][stories-chain: outer.story > nested/inner.story][scenario: S]"
        );
    }

    #[test]
    fn history_id_counts_repeated_raw_titles() {
        let mut story = running("dup.story");
        story.ran_titles.push("Retry".to_owned());
        story.ran_titles.push("Retry".to_owned());
        let stories = vec![story];
        assert_eq!(
            history_id(&stories, "Retry", "Retry with <delay>"),
            "[suite: dup.story][stories-chain: dup.story][scenario: Retry with <delay>-1]"
        );
    }

    #[test]
    fn history_id_tolerates_an_empty_chain() {
        assert_eq!(history_id(&[], "S", "S"), "[suite: ][stories-chain: ][scenario: S]");
    }
}
