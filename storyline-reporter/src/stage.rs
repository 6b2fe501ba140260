// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-thread execution stages and inherited label sets.

use crate::errors::NoActiveStoryError;
use storyline_report::{Label, LabelName};

/// The phase a story is in, used to place synthetic lifecycle test cases.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoryStage {
    /// Story-level lifecycle steps are running before the first scenario.
    BeforeLifecycleSteps,
    /// A scenario is about to run or running.
    BeforeScenario,
    /// The last scenario has finished.
    AfterScenario,
    /// Story-level lifecycle steps are running after the last scenario.
    AfterLifecycleSteps,
}

/// The phase a scenario is in, used to synthesize `@BeforeScenario` and
/// `@AfterScenario` bracketing steps for out-of-band failures.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScenarioStage {
    /// The test case is open but no step has started yet.
    BeforeSteps,
    /// A step is running.
    InProgress,
    /// The last step has closed.
    AfterSteps,
}

#[derive(Clone, Debug, Default)]
struct StageRecord {
    story_stage: Option<StoryStage>,
    scenario_stage: Option<ScenarioStage>,
}

/// Tracks stage records and inherited label sets for one thread.
///
/// One stage record per open story; records stack for nested given
/// stories. Label sets stack the same way, except that the root story's
/// labels live in a dedicated bottom list that is appended to and cleared,
/// never stacked. The step-in-progress flag distinguishes an in-flight
/// step body from positions where a bracketing step may be synthesized;
/// any step close clears it, even with an outer step still open.
#[derive(Clone, Debug, Default)]
pub struct StageTracker {
    records: Vec<StageRecord>,
    root_labels: Vec<Label>,
    given_labels: Vec<Vec<Label>>,
    step_in_progress: bool,
}

impl StageTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        StageTracker::default()
    }

    /// Pushes a stage record for a story that is starting. The story stage
    /// starts unset.
    pub fn push_record(&mut self) {
        self.records.push(StageRecord::default());
    }

    /// Pops the stage record of the story that just ended.
    pub fn pop_record(&mut self) -> Result<(), NoActiveStoryError> {
        self.records.pop().map(|_| ()).ok_or(NoActiveStoryError)
    }

    /// The story stage of the innermost open story, if set.
    pub fn story_stage(&self) -> Option<StoryStage> {
        self.records.last().and_then(|record| record.story_stage)
    }

    /// Sets the story stage on the innermost record.
    pub fn set_story_stage(&mut self, stage: StoryStage) -> Result<(), NoActiveStoryError> {
        let record = self.records.last_mut().ok_or(NoActiveStoryError)?;
        record.story_stage = Some(stage);
        Ok(())
    }

    /// The scenario stage of the innermost open story. Absent both when no
    /// story is open and when no scenario phase applies.
    pub fn scenario_stage(&self) -> Option<ScenarioStage> {
        self.records.last().and_then(|record| record.scenario_stage)
    }

    /// Sets the scenario stage on the innermost record.
    pub fn set_scenario_stage(&mut self, stage: ScenarioStage) -> Result<(), NoActiveStoryError> {
        let record = self.records.last_mut().ok_or(NoActiveStoryError)?;
        record.scenario_stage = Some(stage);
        Ok(())
    }

    /// Clears the scenario stage when a test case closes.
    pub fn clear_scenario_stage(&mut self) -> Result<(), NoActiveStoryError> {
        let record = self.records.last_mut().ok_or(NoActiveStoryError)?;
        record.scenario_stage = None;
        Ok(())
    }

    /// Makes the label list for a starting story current and returns it for
    /// population.
    ///
    /// A given story gets a fresh stacked list; a root story gets the
    /// bottom list directly.
    pub fn push_label_set(&mut self, given_story: bool) -> &mut Vec<Label> {
        if given_story {
            self.given_labels.push(Vec::new());
            self.given_labels.last_mut().expect("pushed just above")
        } else {
            &mut self.root_labels
        }
    }

    /// The labels inherited by nodes opened right now.
    pub fn current_labels(&self) -> &[Label] {
        self.given_labels.last().map_or(&self.root_labels, Vec::as_slice)
    }

    /// Drops the label list of the story that just ended. Root labels are
    /// cleared in place rather than popped.
    pub fn pop_label_set(&mut self, given_story: bool) {
        if given_story {
            self.given_labels.pop();
        } else {
            self.root_labels.clear();
        }
    }

    /// The root story's suite label value, used as the parent suite of
    /// given-story test cases.
    pub fn root_suite(&self) -> Option<&str> {
        self.root_labels
            .iter()
            .find(|label| label.name == LabelName::Suite.as_str())
            .map(|label| label.value.as_str())
    }

    /// True while a concrete step body is in flight on this thread.
    pub fn step_in_progress(&self) -> bool {
        self.step_in_progress
    }

    /// Records a step opening or closing. A close clears the flag even
    /// when an enclosing step is still open.
    pub fn set_step_in_progress(&mut self, in_progress: bool) {
        self.step_in_progress = in_progress;
    }
}
