// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end event flows through the translator, asserted against the
//! recorded backend protocol and the written report tree.

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use storyline_report::{
    BackendOp, LabelName, LinkType, NodeId, NoopSession, Parameter, RecordingBackend,
    ReportSession, SessionError, Status, TestCaseResult,
};
use storyline_reporter::config::ReporterConfig;
use storyline_reporter::events::{LogLevel, StoryEvent};
use storyline_reporter::failure::{Failure, FailureKind, KnownIssue};
use storyline_reporter::reporter::RunListener;
use storyline_reporter::run_model::{Meta, Scenario, Story};
use storyline_reporter::translator::StoryReporter;

fn reporter_parts(
    config: ReporterConfig,
    session: Arc<dyn ReportSession>,
) -> (StoryReporter, Arc<RecordingBackend>) {
    // Only the first subscriber sticks; later attempts are no-ops.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let backend = Arc::new(RecordingBackend::new());
    let reporter = StoryReporter::new(backend.clone(), session, config);
    (reporter, backend)
}

fn reporter_with(config: ReporterConfig) -> (StoryReporter, Arc<RecordingBackend>) {
    reporter_parts(config, Arc::new(NoopSession))
}

fn reporter() -> (StoryReporter, Arc<RecordingBackend>) {
    reporter_with(ReporterConfig::default())
}

fn drive(reporter: &StoryReporter, events: impl IntoIterator<Item = StoryEvent>) {
    for event in events {
        reporter.handle_event(&event).expect("event translates");
    }
}

fn story(path: &str) -> Story {
    Story::new(path, Meta::new(), 0)
}

fn scenario(id: &str, title: &str) -> Scenario {
    Scenario::new(id, title, Meta::new())
}

fn step(text: &str) -> [StoryEvent; 2] {
    [
        StoryEvent::BeforeStep { text: text.to_owned() },
        StoryEvent::Successful { text: text.to_owned() },
    ]
}

fn label_value(test_case: &TestCaseResult, name: LabelName) -> Option<&str> {
    test_case
        .labels
        .iter()
        .find(|label| label.name == name.as_str())
        .map(|label| label.value.as_str())
}

#[derive(Default)]
struct CountingSession {
    opens: AtomicUsize,
    flushes: AtomicUsize,
}

impl ReportSession for CountingSession {
    fn open(&self) -> Result<(), SessionError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn flush(&self) -> Result<(), SessionError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn a_passing_scenario_is_written_as_one_test_case() {
    let (reporter, backend) = reporter();
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("suites/checkout.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Pay by card") },
        ],
    );
    drive(&reporter, step("When the user pays"));
    drive(&reporter, [StoryEvent::AfterScenario, StoryEvent::AfterStory { given_story: false }]);

    let written = backend.written();
    assert_eq!(written.len(), 1);
    let test_case = &written[0];
    assert_eq!(test_case.id, NodeId::new("s-1"));
    assert_eq!(test_case.name, "Pay by card");
    assert_eq!(test_case.status, Status::Passed);
    assert_eq!(
        test_case.history_id.as_deref(),
        Some(
            "[suite: checkout.story][stories-chain: suites/checkout.story]\
             [scenario: Pay by card]"
        )
    );
    assert_eq!(test_case.steps.len(), 1);
    assert_eq!(test_case.steps[0].name, "When the user pays");
    assert_eq!(test_case.steps[0].status, Status::Passed);
    assert_eq!(label_value(test_case, LabelName::Suite), Some("checkout.story"));
    assert_eq!(label_value(test_case, LabelName::Story), Some("checkout.story"));
    assert_eq!(backend.open_nodes().expect("store usable"), 0);
}

#[test]
fn example_rows_become_one_test_case_each() {
    let (reporter, backend) = reporter();
    let story = Story::new("orders.story", Meta::from_pairs([("env", "staging")]), 0);
    let scenario = Scenario::new("s-9", "Order <item>", Meta::new()).with_example_rows(3);
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story, given_story: false },
            StoryEvent::BeforeScenario { scenario },
        ],
    );
    for (index, item) in ["tea", "chai", "oolong"].into_iter().enumerate() {
        let row = IndexMap::from([
            ("item".to_owned(), item.to_owned()),
            ("env".to_owned(), "staging".to_owned()),
        ]);
        drive(&reporter, [StoryEvent::Example { row, index }]);
        drive(&reporter, step("When the item is ordered"));
    }
    drive(&reporter, [StoryEvent::AfterScenario, StoryEvent::AfterStory { given_story: false }]);

    let written = backend.written();
    assert_eq!(written.len(), 3);
    for (index, test_case) in written.iter().enumerate() {
        assert_eq!(test_case.id, NodeId::new(format!("s-9[{index}]")));
        assert_eq!(test_case.name, "Order <item>");
        assert_eq!(test_case.status, Status::Passed);
    }
    // Keys already present in story or scenario meta are not parameters.
    assert_eq!(written[0].parameters, vec![Parameter::new("item", "tea")]);
    assert_eq!(written[2].parameters, vec![Parameter::new("item", "oolong")]);

    // Each row's test case closes before the next one is scheduled.
    let ops = backend.ops();
    let first_written = ops
        .iter()
        .position(|op| *op == BackendOp::WriteTestCase(NodeId::new("s-9[0]")))
        .expect("first row written");
    let second_scheduled = ops
        .iter()
        .position(|op| *op == BackendOp::ScheduleTestCase(NodeId::new("s-9[1]")))
        .expect("second row scheduled");
    assert!(first_written < second_scheduled, "example rows must not overlap");
    assert_eq!(backend.open_nodes().expect("store usable"), 0);
}

#[test]
fn known_issue_failures_link_the_issue_on_the_test_case() {
    let mut config = ReporterConfig::default();
    config.link_templates.issue = Some("https://issues.example.com/{}".to_owned());
    let (reporter, backend) = reporter_with(config);

    let failure = Failure::new(
        "VerificationError",
        FailureKind::Verification {
            known_issues: vec![KnownIssue::new("ABC-1", false), KnownIssue::new("ABC-2", true)],
            known_issues_only: false,
        },
    )
    .with_message("expected tea, poured coffee");
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("brew.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Brew check") },
            StoryEvent::BeforeStep { text: "When the brew is checked".to_owned() },
            StoryEvent::Failed { text: "When the brew is checked against menu".to_owned(), failure },
            StoryEvent::AfterScenario,
            StoryEvent::AfterStory { given_story: false },
        ],
    );

    let written = backend.written();
    assert_eq!(written.len(), 1);
    let test_case = &written[0];
    assert_eq!(test_case.status, Status::Failed);
    let detail = test_case.status_detail.as_ref().expect("failure detail recorded");
    assert_eq!(detail.message.as_deref(), Some("expected tea, poured coffee"));

    // Only firmly known issues are linked; potentially-known matches stay
    // out of the report.
    assert_eq!(test_case.links.len(), 1);
    assert_eq!(test_case.links[0].name, "ABC-1");
    assert_eq!(test_case.links[0].url.as_deref(), Some("https://issues.example.com/ABC-1"));
    assert_eq!(test_case.links[0].link_type, LinkType::Issue);

    assert_eq!(test_case.steps[0].name, "When the brew is checked against menu");
    assert_eq!(test_case.steps[0].status, Status::Failed);
}

#[test]
fn cancellation_breaks_open_nodes_and_resets_the_thread() {
    let (reporter, backend) = reporter();
    let slow = story("slow.story");
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: slow.clone(), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Slow path") },
            StoryEvent::BeforeStep { text: "When waiting".to_owned() },
            StoryEvent::SubStepsStart,
            StoryEvent::StoryCancelled { story: slow, duration_secs: 30 },
        ],
    );

    let written = backend.written();
    assert_eq!(written.len(), 1);
    let test_case = &written[0];
    assert_eq!(test_case.status, Status::Broken);
    let detail = test_case.status_detail.as_ref().expect("timeout detail recorded");
    assert_eq!(detail.message.as_deref(), Some("Story timed out after 30s"));
    assert_eq!(test_case.steps[0].name, "When waiting");
    assert_eq!(test_case.steps[0].status, Status::Broken);
    assert_eq!(test_case.steps[0].steps[0].status, Status::Broken);
    assert_eq!(backend.open_nodes().expect("store usable"), 0);

    // The thread is reusable for the next story.
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("next.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-2", "Next") },
        ],
    );
    drive(&reporter, step("When it proceeds"));
    drive(&reporter, [StoryEvent::AfterScenario, StoryEvent::AfterStory { given_story: false }]);
    let written = backend.written();
    assert_eq!(written.len(), 2);
    assert_eq!(written[1].status, Status::Passed);
}

#[test]
fn story_lifecycle_steps_get_synthetic_test_cases() {
    let (reporter, backend) = reporter();
    drive(
        &reporter,
        [StoryEvent::BeforeStory { story: story("lifecycle.story"), given_story: false }],
    );
    drive(&reporter, step("Given prepared data"));
    drive(&reporter, [StoryEvent::BeforeScenario { scenario: scenario("s-1", "Body check") }]);
    drive(&reporter, step("When the body runs"));
    drive(&reporter, [StoryEvent::AfterScenario]);
    drive(&reporter, step("Then data is wiped"));
    drive(&reporter, [StoryEvent::AfterStory { given_story: false }]);

    let written = backend.written();
    let names: Vec<&str> = written.iter().map(|test_case| test_case.name.as_str()).collect();
    assert_eq!(names, vec!["Lifecycle: Before story", "Body check", "Lifecycle: After story"]);
    for test_case in &written {
        assert_eq!(test_case.status, Status::Passed);
        assert_eq!(test_case.steps.len(), 1);
        assert_eq!(label_value(test_case, LabelName::Suite), Some("lifecycle.story"));
    }
    assert_eq!(written[0].steps[0].name, "Given prepared data");
    assert_eq!(written[2].steps[0].name, "Then data is wiped");
    assert_eq!(backend.open_nodes().expect("store usable"), 0);
}

#[test]
fn given_stories_nest_as_steps_and_keep_their_labels_scoped() {
    let (reporter, backend) = reporter();
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("outer.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Outer scenario") },
            StoryEvent::BeforeStory { story: story("given/inner.story"), given_story: true },
            StoryEvent::BeforeScenario { scenario: scenario("s-2", "Inner scenario") },
        ],
    );
    drive(&reporter, step("When inner acts"));
    drive(&reporter, [StoryEvent::AfterScenario, StoryEvent::AfterStory { given_story: true }]);
    drive(&reporter, step("Then outer checks"));
    drive(&reporter, [StoryEvent::AfterScenario]);
    drive(&reporter, [StoryEvent::BeforeScenario { scenario: scenario("s-3", "Second check") }]);
    drive(&reporter, step("Then it holds"));
    drive(&reporter, [StoryEvent::AfterScenario, StoryEvent::AfterStory { given_story: false }]);

    let written = backend.written();
    assert_eq!(written.len(), 2, "inner scenarios become steps, not test cases");

    let outer = &written[0];
    assert_eq!(outer.name, "Outer scenario");
    let step_names: Vec<&str> = outer.steps.iter().map(|step| step.name.as_str()).collect();
    assert_eq!(step_names, vec!["Given Story: inner.story", "Then outer checks"]);
    let given_step = &outer.steps[0];
    assert_eq!(given_step.status, Status::Passed);
    assert_eq!(given_step.steps.len(), 1);
    assert_eq!(given_step.steps[0].name, "Inner scenario");
    assert_eq!(given_step.steps[0].steps[0].name, "When inner acts");

    let second = &written[1];
    assert_eq!(second.name, "Second check");
    assert_eq!(label_value(second, LabelName::Suite), Some("outer.story"));
    assert_eq!(label_value(second, LabelName::ParentSuite), None);
    assert_eq!(backend.open_nodes().expect("store usable"), 0);
}

#[test]
fn dry_runs_report_given_story_scenarios_as_plain_steps() {
    let mut config = ReporterConfig::default();
    config.dry_run = true;
    let (reporter, backend) = reporter_with(config);
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("outer.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Outer scenario") },
            StoryEvent::BeforeStory { story: story("given/inner.story"), given_story: true },
            StoryEvent::BeforeScenario { scenario: scenario("s-2", "Inner scenario") },
        ],
    );
    drive(&reporter, step("When inner acts"));
    drive(&reporter, [StoryEvent::AfterScenario, StoryEvent::AfterStory { given_story: true }]);
    drive(&reporter, step("Then outer checks"));
    drive(&reporter, [StoryEvent::AfterScenario, StoryEvent::AfterStory { given_story: false }]);

    let written = backend.written();
    assert_eq!(written.len(), 1);
    let test_case = &written[0];
    assert_eq!(test_case.name, "Outer scenario");
    assert_eq!(test_case.status, Status::Passed);

    // No wrapper step in dry runs; the inner scenario nests directly.
    let step_names: Vec<&str> = test_case.steps.iter().map(|step| step.name.as_str()).collect();
    assert_eq!(step_names, vec!["Inner scenario", "Then outer checks"]);
    assert_eq!(test_case.steps[0].steps[0].name, "When inner acts");

    assert_eq!(label_value(test_case, LabelName::Suite), Some("outer.story"));
    assert_eq!(label_value(test_case, LabelName::ParentSuite), None);
    assert_eq!(backend.open_nodes().expect("store usable"), 0);
}

#[test]
fn composite_steps_nest_their_expansion() {
    let (reporter, backend) = reporter();
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("composite.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Composite") },
            StoryEvent::BeforeStep { text: "When composite runs".to_owned() },
            StoryEvent::SubStepsStart,
        ],
    );
    drive(&reporter, step("When part one runs"));
    drive(
        &reporter,
        [
            StoryEvent::SubStepsFinish { title: "1 sub-step".to_owned(), failure: None },
            StoryEvent::Successful { text: "When composite runs".to_owned() },
            StoryEvent::AfterScenario,
            StoryEvent::AfterStory { given_story: false },
        ],
    );

    let written = backend.written();
    let composite = &written[0].steps[0];
    assert_eq!(composite.name, "When composite runs");
    assert_eq!(composite.steps.len(), 1);
    assert_eq!(composite.steps[0].name, "1 sub-step");
    assert_eq!(composite.steps[0].steps[0].name, "When part one runs");
    assert_eq!(written[0].status, Status::Passed);
}

#[test]
fn attachments_links_and_logs_decorate_the_open_nodes() {
    let mut config = ReporterConfig::default();
    config.link_templates.tms = Some("https://tms.example.com/{}".to_owned());
    config.test_run_id = Some("RUN-7".to_owned());
    let (reporter, backend) = reporter_with(config);

    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("capture.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Captured") },
            StoryEvent::BeforeStep { text: "When captured".to_owned() },
            StoryEvent::AttachmentPublished {
                title: "screenshot".to_owned(),
                content_type: "image/png".to_owned(),
                content: b"png".to_vec(),
            },
            StoryEvent::LogEntry { level: LogLevel::Info, text: "clicked".to_owned() },
            StoryEvent::LogEntry { level: LogLevel::Debug, text: "wire dump".to_owned() },
            StoryEvent::LinkPublished {
                name: "run dashboard".to_owned(),
                url: "https://dash.example.com/1".to_owned(),
            },
            StoryEvent::LinkPublished {
                name: "run dashboard".to_owned(),
                url: "https://dash.example.com/1".to_owned(),
            },
            StoryEvent::Successful { text: "When captured".to_owned() },
            StoryEvent::AfterScenario,
            StoryEvent::AfterStory { given_story: false },
        ],
    );

    let written = backend.written();
    let test_case = &written[0];

    // Republished links are deduplicated; the test run link is added when
    // the case closes.
    assert_eq!(test_case.links.len(), 2);
    assert_eq!(test_case.links[0].name, "run dashboard");
    assert_eq!(test_case.links[0].link_type, LinkType::Custom);
    assert_eq!(test_case.links[1].name, "Test run ID");
    assert_eq!(test_case.links[1].url.as_deref(), Some("https://tms.example.com/RUN-7"));
    assert_eq!(test_case.links[1].link_type, LinkType::Tms);

    let captured = &test_case.steps[0];
    assert_eq!(captured.attachments.len(), 1);
    assert_eq!(captured.attachments[0].name, "screenshot");
    assert_eq!(captured.attachments[0].content_type, "image/png");

    let log_names: Vec<&str> = captured.steps.iter().map(|step| step.name.as_str()).collect();
    assert_eq!(log_names, vec!["clicked", "wire dump"]);
    assert_eq!(captured.steps[0].status, Status::Passed);
    assert!(captured.steps[0].status_detail.is_none());
    let muted = captured.steps[1].status_detail.as_ref().expect("debug logs carry muted detail");
    assert!(muted.muted);

    let attachments = backend.attachments();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].1, b"png".to_vec());
}

#[test]
fn steps_after_a_failure_do_not_dilute_the_verdict() {
    let (reporter, backend) = reporter();
    let failure = Failure::new("AssertionError", FailureKind::Assertion)
        .with_message("expected 2, was 3");
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("verdict.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Verdict") },
            StoryEvent::BeforeStep { text: "When it breaks".to_owned() },
            StoryEvent::Failed { text: "When it breaks".to_owned(), failure },
            StoryEvent::BeforeStep { text: "Then never runs".to_owned() },
            StoryEvent::NotPerformed { text: "Then never runs".to_owned() },
            StoryEvent::AfterScenario,
            StoryEvent::AfterStory { given_story: false },
        ],
    );

    let test_case = &backend.written()[0];
    assert_eq!(test_case.status, Status::Failed);
    let detail = test_case.status_detail.as_ref().expect("failure detail kept");
    assert_eq!(detail.message.as_deref(), Some("expected 2, was 3"));

    assert_eq!(test_case.steps[0].status, Status::Failed);
    assert_eq!(test_case.steps[1].name, "Then never runs");
    assert_eq!(test_case.steps[1].status, Status::Skipped);
    assert!(test_case.steps[1].status_detail.is_none());
}

#[test]
fn a_pending_step_is_written_as_skipped_with_the_marker() {
    let (reporter, backend) = reporter();
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("pending.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Pending") },
            StoryEvent::BeforeStep { text: "When unimplemented".to_owned() },
            StoryEvent::Pending { text: "When unimplemented".to_owned() },
            StoryEvent::AfterScenario,
            StoryEvent::AfterStory { given_story: false },
        ],
    );

    let test_case = &backend.written()[0];
    assert_eq!(test_case.status, Status::Skipped);
    let detail = test_case.status_detail.as_ref().expect("marker recorded");
    assert_eq!(detail.message.as_deref(), Some("The step is not implemented"));
    assert_eq!(test_case.effective_status(), Status::Pending);
}

#[test]
fn comments_skip_their_own_step_without_touching_the_verdict() {
    let (reporter, backend) = reporter();
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("ledger.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Balanced books") },
        ],
    );
    drive(&reporter, step("Given the ledger is loaded"));
    drive(
        &reporter,
        [
            StoryEvent::BeforeStep { text: "!-- audit disabled".to_owned() },
            StoryEvent::Comment { text: "!-- audit disabled".to_owned() },
        ],
    );
    drive(&reporter, step("Then the balance is zero"));
    drive(&reporter, [StoryEvent::AfterScenario, StoryEvent::AfterStory { given_story: false }]);

    let test_case = &backend.written()[0];
    assert_eq!(test_case.status, Status::Passed);
    assert!(test_case.status_detail.is_none());

    let step_names: Vec<&str> = test_case.steps.iter().map(|step| step.name.as_str()).collect();
    assert_eq!(
        step_names,
        vec!["Given the ledger is loaded", "!-- audit disabled", "Then the balance is zero"]
    );
    assert_eq!(test_case.steps[1].status, Status::Skipped);
    assert!(test_case.steps[1].status_detail.is_none());
    assert_eq!(backend.open_nodes().expect("store usable"), 0);
}

#[test]
fn an_ignorable_step_skips_the_whole_test_case() {
    let (reporter, backend) = reporter();
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("toggles.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Legacy path off") },
        ],
    );
    drive(&reporter, step("Given the flag is off"));
    drive(
        &reporter,
        [
            StoryEvent::BeforeStep { text: "When the legacy path runs".to_owned() },
            StoryEvent::Ignorable { text: "When the legacy path runs".to_owned() },
            StoryEvent::AfterScenario,
            StoryEvent::AfterStory { given_story: false },
        ],
    );

    let test_case = &backend.written()[0];
    assert_eq!(test_case.status, Status::Skipped);
    let detail = test_case.status_detail.as_ref().expect("skip reason recorded");
    assert_eq!(detail.message.as_deref(), Some("The step is commented"));
    // Only the pending marker re-ranks a skip.
    assert_eq!(test_case.effective_status(), Status::Skipped);

    assert_eq!(test_case.steps[0].status, Status::Passed);
    assert_eq!(test_case.steps[1].status, Status::Skipped);
    assert!(test_case.steps[1].status_detail.is_none());
}

#[test]
fn soft_assertions_mark_every_open_step_in_place() {
    let (reporter, backend) = reporter();
    let failure =
        Failure::new("AssertionError", FailureKind::Assertion).with_message("total is off by one");
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("audit.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Invoice audit") },
            StoryEvent::BeforeStep { text: "When the invoice is audited".to_owned() },
            StoryEvent::SubStepsStart,
            StoryEvent::AssertionFailed { failure },
        ],
    );
    // Nothing closes: the test case and both steps stay open.
    assert_eq!(backend.open_nodes().expect("store usable"), 3);

    drive(
        &reporter,
        [
            StoryEvent::SubStepsFinish { title: "3 checks".to_owned(), failure: None },
            StoryEvent::Successful { text: "When the invoice is audited".to_owned() },
            StoryEvent::AfterScenario,
            StoryEvent::AfterStory { given_story: false },
        ],
    );

    let test_case = &backend.written()[0];
    let audited = &test_case.steps[0];
    assert_eq!(audited.name, "When the invoice is audited");
    assert_eq!(audited.status, Status::Failed);
    assert_eq!(audited.steps[0].name, "3 checks");
    assert_eq!(audited.steps[0].status, Status::Failed);

    // The verdict still comes from the close events alone.
    assert_eq!(test_case.status, Status::Passed);
    assert!(test_case.status_detail.is_none());
}

#[test]
fn excluded_stories_report_nothing() {
    let (reporter, backend) = reporter();
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory {
                story: story("filtered/flaky.story").excluded(),
                given_story: false,
            },
            StoryEvent::AfterStory { given_story: false },
        ],
    );
    assert!(backend.ops().is_empty());
    assert!(backend.written().is_empty());

    // The thread carries straight on to the next story.
    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("kept.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Kept") },
        ],
    );
    drive(&reporter, step("When it runs"));
    drive(&reporter, [StoryEvent::AfterScenario, StoryEvent::AfterStory { given_story: false }]);

    let written = backend.written();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].name, "Kept");
    assert_eq!(written[0].status, Status::Passed);
    assert_eq!(backend.open_nodes().expect("store usable"), 0);
}

#[test]
fn reserved_story_names_open_and_flush_the_session() {
    let session = Arc::new(CountingSession::default());
    let (reporter, backend) = reporter_parts(ReporterConfig::default(), session.clone());

    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("BeforeStories"), given_story: false },
            StoryEvent::AfterStory { given_story: false },
        ],
    );
    assert_eq!(session.opens.load(Ordering::SeqCst), 1);
    assert_eq!(session.flushes.load(Ordering::SeqCst), 0);

    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("smoke.story"), given_story: false },
            StoryEvent::BeforeScenario { scenario: scenario("s-1", "Smoke check") },
        ],
    );
    drive(&reporter, step("When the smoke clears"));
    drive(&reporter, [StoryEvent::AfterScenario, StoryEvent::AfterStory { given_story: false }]);

    drive(
        &reporter,
        [
            StoryEvent::BeforeStory { story: story("AfterStories"), given_story: false },
            StoryEvent::AfterStory { given_story: false },
            StoryEvent::BeforeStory { story: story("AbortedStories"), given_story: false },
            StoryEvent::AfterStory { given_story: false },
        ],
    );

    assert_eq!(session.opens.load(Ordering::SeqCst), 1);
    assert_eq!(session.flushes.load(Ordering::SeqCst), 2);

    // Reserved stories write no test cases of their own.
    let written = backend.written();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].name, "Smoke check");
    assert_eq!(backend.open_nodes().expect("store usable"), 0);
}
