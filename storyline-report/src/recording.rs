// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A backend decorator that records the operation sequence it accepts.
//!
//! Protocol-level assertions (what was opened, in what order, against which
//! node) read the recorded ops; tree-level assertions read the written
//! results. Intended for tests of translator behavior.

use crate::errors::StoreError;
use crate::model::{NodeId, StepResult, TestCaseResult};
use crate::store::{ReportBackend, ReportStore};
use crate::writer::InMemoryResultsWriter;
use std::sync::{Arc, Mutex, PoisonError};

/// One accepted backend operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendOp {
    /// A test case was scheduled.
    ScheduleTestCase(NodeId),
    /// A test case was started.
    StartTestCase(NodeId),
    /// A test case was updated.
    UpdateTestCase(NodeId),
    /// A test case was stopped.
    StopTestCase(NodeId),
    /// A test case was written and released.
    WriteTestCase(NodeId),
    /// A step was opened under a parent node.
    StartStep {
        /// The enclosing node.
        parent: NodeId,
        /// The opened step.
        id: NodeId,
    },
    /// A step was updated.
    UpdateStep(NodeId),
    /// A step was closed.
    StopStep(NodeId),
    /// An attachment was recorded on a node.
    AddAttachment {
        /// The node the attachment landed on.
        node: NodeId,
        /// The display name of the attachment.
        name: String,
    },
}

/// An in-memory [`ReportStore`] that also journals every accepted call.
pub struct RecordingBackend {
    ops: Mutex<Vec<BackendOp>>,
    store: ReportStore,
    writer: Arc<InMemoryResultsWriter>,
}

impl RecordingBackend {
    /// Creates an empty recording backend.
    pub fn new() -> Self {
        let writer = Arc::new(InMemoryResultsWriter::new());
        RecordingBackend {
            ops: Mutex::new(Vec::new()),
            store: ReportStore::new(writer.clone()),
            writer,
        }
    }

    /// The accepted operations, in call order.
    pub fn ops(&self) -> Vec<BackendOp> {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The test cases written so far, in write order.
    pub fn written(&self) -> Vec<TestCaseResult> {
        self.writer.written()
    }

    /// The attachments written so far as `(source, content)` pairs.
    pub fn attachments(&self) -> Vec<(String, Vec<u8>)> {
        self.writer.attachments()
    }

    /// The number of nodes still open in the underlying store.
    pub fn open_nodes(&self) -> Result<usize, StoreError> {
        self.store.open_nodes()
    }

    fn record(&self, op: BackendOp) {
        self.ops.lock().unwrap_or_else(PoisonError::into_inner).push(op);
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBackend for RecordingBackend {
    fn schedule_test_case(&self, test_case: TestCaseResult) -> Result<(), StoreError> {
        let id = test_case.id.clone();
        self.store.schedule_test_case(test_case)?;
        self.record(BackendOp::ScheduleTestCase(id));
        Ok(())
    }

    fn start_test_case(&self, id: &NodeId) -> Result<(), StoreError> {
        self.store.start_test_case(id)?;
        self.record(BackendOp::StartTestCase(id.clone()));
        Ok(())
    }

    fn update_test_case(
        &self,
        id: &NodeId,
        mutate: &mut dyn FnMut(&mut TestCaseResult),
    ) -> Result<(), StoreError> {
        self.store.update_test_case(id, mutate)?;
        self.record(BackendOp::UpdateTestCase(id.clone()));
        Ok(())
    }

    fn stop_test_case(&self, id: &NodeId) -> Result<(), StoreError> {
        self.store.stop_test_case(id)?;
        self.record(BackendOp::StopTestCase(id.clone()));
        Ok(())
    }

    fn write_test_case(&self, id: &NodeId) -> Result<(), StoreError> {
        self.store.write_test_case(id)?;
        self.record(BackendOp::WriteTestCase(id.clone()));
        Ok(())
    }

    fn start_step(&self, parent: &NodeId, id: &NodeId, step: StepResult) -> Result<(), StoreError> {
        self.store.start_step(parent, id, step)?;
        self.record(BackendOp::StartStep { parent: parent.clone(), id: id.clone() });
        Ok(())
    }

    fn update_step(
        &self,
        id: &NodeId,
        mutate: &mut dyn FnMut(&mut StepResult),
    ) -> Result<(), StoreError> {
        self.store.update_step(id, mutate)?;
        self.record(BackendOp::UpdateStep(id.clone()));
        Ok(())
    }

    fn stop_step(&self, id: &NodeId) -> Result<(), StoreError> {
        self.store.stop_step(id)?;
        self.record(BackendOp::StopStep(id.clone()));
        Ok(())
    }

    fn add_attachment(
        &self,
        node: &NodeId,
        name: &str,
        content_type: &str,
        content: &[u8],
    ) -> Result<(), StoreError> {
        self.store.add_attachment(node, name, content_type, content)?;
        self.record(BackendOp::AddAttachment { node: node.clone(), name: name.to_owned() });
        Ok(())
    }
}
