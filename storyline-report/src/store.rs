// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The backend protocol and its in-memory implementation.

use crate::errors::StoreError;
use crate::model::{Attachment, NodeId, StepResult, TestCaseResult};
use crate::writer::ResultsWriter;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// The protocol a reporting backend exposes to the translator.
///
/// Nodes are addressed by id only; the caller holds no references into the
/// backend. Implementations must support concurrent calls for independent
/// test cases. All calls are synchronous and are not retried on failure.
pub trait ReportBackend: Send + Sync {
    /// Registers a test case that is about to start.
    fn schedule_test_case(&self, test_case: TestCaseResult) -> Result<(), StoreError>;

    /// Marks a scheduled test case as started, stamping its start time.
    fn start_test_case(&self, id: &NodeId) -> Result<(), StoreError>;

    /// Mutates an open test case in place.
    fn update_test_case(
        &self,
        id: &NodeId,
        mutate: &mut dyn FnMut(&mut TestCaseResult),
    ) -> Result<(), StoreError>;

    /// Marks a test case as stopped, stamping its stop time.
    fn stop_test_case(&self, id: &NodeId) -> Result<(), StoreError>;

    /// Durably persists a stopped test case and releases it.
    fn write_test_case(&self, id: &NodeId) -> Result<(), StoreError>;

    /// Opens a step under an open parent node.
    fn start_step(&self, parent: &NodeId, id: &NodeId, step: StepResult) -> Result<(), StoreError>;

    /// Mutates an open step in place.
    fn update_step(
        &self,
        id: &NodeId,
        mutate: &mut dyn FnMut(&mut StepResult),
    ) -> Result<(), StoreError>;

    /// Closes a step, folding it into its parent node.
    fn stop_step(&self, id: &NodeId) -> Result<(), StoreError>;

    /// Persists attachment content and records it on an open node.
    fn add_attachment(
        &self,
        node: &NodeId,
        name: &str,
        content_type: &str,
        content: &[u8],
    ) -> Result<(), StoreError>;
}

/// In-memory report store.
///
/// Open test cases and steps are held in id-keyed maps behind one mutex;
/// a step folds into its parent when it stops, and a written test case is
/// handed to the results writer and released. Parents outlive their
/// children by the closure ordering invariant; a violation surfaces as
/// [`StoreError::MissingParent`].
pub struct ReportStore {
    writer: Arc<dyn ResultsWriter>,
    inner: Mutex<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    test_cases: HashMap<NodeId, TestCaseSlot>,
    steps: HashMap<NodeId, OpenStep>,
}

struct TestCaseSlot {
    result: TestCaseResult,
    stopped: bool,
}

struct OpenStep {
    step: StepResult,
    parent: NodeId,
}

impl ReportStore {
    /// Creates a store that persists written test cases through `writer`.
    pub fn new(writer: Arc<dyn ResultsWriter>) -> Self {
        ReportStore { writer, inner: Mutex::new(StoreInner::default()) }
    }

    /// The number of nodes currently open (scheduled or started, not yet
    /// written or folded).
    pub fn open_nodes(&self) -> Result<usize, StoreError> {
        let inner = self.lock()?;
        Ok(inner.test_cases.len() + inner.steps.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreInner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl ReportBackend for ReportStore {
    fn schedule_test_case(&self, test_case: TestCaseResult) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner
            .test_cases
            .insert(test_case.id.clone(), TestCaseSlot { result: test_case, stopped: false });
        Ok(())
    }

    fn start_test_case(&self, id: &NodeId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let slot = inner
            .test_cases
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownTestCase { id: id.clone() })?;
        slot.result.start = Some(Utc::now());
        Ok(())
    }

    fn update_test_case(
        &self,
        id: &NodeId,
        mutate: &mut dyn FnMut(&mut TestCaseResult),
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let slot = inner
            .test_cases
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownTestCase { id: id.clone() })?;
        mutate(&mut slot.result);
        Ok(())
    }

    fn stop_test_case(&self, id: &NodeId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let slot = inner
            .test_cases
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownTestCase { id: id.clone() })?;
        slot.result.stop = Some(Utc::now());
        slot.stopped = true;
        Ok(())
    }

    fn write_test_case(&self, id: &NodeId) -> Result<(), StoreError> {
        // Write outside the lock; the node is released only once the write
        // succeeded.
        let result = {
            let inner = self.lock()?;
            let slot = inner
                .test_cases
                .get(id)
                .ok_or_else(|| StoreError::UnknownTestCase { id: id.clone() })?;
            if !slot.stopped {
                return Err(StoreError::TestCaseNotStopped { id: id.clone() });
            }
            slot.result.clone()
        };
        self.writer.write_test_case(&result)?;
        self.lock()?.test_cases.remove(id);
        Ok(())
    }

    fn start_step(&self, parent: &NodeId, id: &NodeId, step: StepResult) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if !inner.test_cases.contains_key(parent) && !inner.steps.contains_key(parent) {
            return Err(StoreError::MissingParent { id: id.clone(), parent: parent.clone() });
        }
        let mut step = step;
        step.start = Some(Utc::now());
        inner.steps.insert(id.clone(), OpenStep { step, parent: parent.clone() });
        Ok(())
    }

    fn update_step(
        &self,
        id: &NodeId,
        mutate: &mut dyn FnMut(&mut StepResult),
    ) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let open =
            inner.steps.get_mut(id).ok_or_else(|| StoreError::UnknownStep { id: id.clone() })?;
        mutate(&mut open.step);
        Ok(())
    }

    fn stop_step(&self, id: &NodeId) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let open =
            inner.steps.remove(id).ok_or_else(|| StoreError::UnknownStep { id: id.clone() })?;
        let OpenStep { mut step, parent } = open;
        step.stop = Some(Utc::now());
        if let Some(parent_step) = inner.steps.get_mut(&parent) {
            parent_step.step.add_step(step);
        } else if let Some(slot) = inner.test_cases.get_mut(&parent) {
            slot.result.add_step(step);
        } else {
            return Err(StoreError::MissingParent { id: id.clone(), parent });
        }
        Ok(())
    }

    fn add_attachment(
        &self,
        node: &NodeId,
        name: &str,
        content_type: &str,
        content: &[u8],
    ) -> Result<(), StoreError> {
        let source = format!("{}-attachment{}", Uuid::new_v4(), extension_for(content_type));
        self.writer.write_attachment(&source, content)?;
        let attachment = Attachment::new(name, source, content_type);
        let mut inner = self.lock()?;
        if let Some(open) = inner.steps.get_mut(node) {
            open.step.add_attachment(attachment);
        } else if let Some(slot) = inner.test_cases.get_mut(node) {
            slot.result.add_attachment(attachment);
        } else {
            return Err(StoreError::UnknownNode { id: node.clone() });
        }
        Ok(())
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "application/json" => ".json",
        "text/plain" => ".txt",
        "text/html" => ".html",
        "text/csv" => ".csv",
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        _ => "",
    }
}
