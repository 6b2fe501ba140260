// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The execution path: the current nesting chain of open report nodes.

use crate::errors::EmptyPathError;
use std::sync::Arc;
use storyline_report::NodeId;

/// A persistent stack of node ids, innermost node first.
///
/// `push` and `pop` return new paths and never mutate shared nodes, so a
/// path captured earlier (for example inside an in-flight logical
/// operation) stays valid while the thread's current path moves on. Each
/// thread owns exactly one current path at a time; the spine is
/// reference-counted to make the persistent copies cheap.
#[derive(Clone, Debug, Default)]
pub struct ExecutionPath {
    head: Option<Arc<PathNode>>,
}

#[derive(Debug)]
struct PathNode {
    id: NodeId,
    tail: Option<Arc<PathNode>>,
}

impl ExecutionPath {
    /// Creates an empty path: no node is open.
    pub fn new() -> Self {
        ExecutionPath::default()
    }

    /// Returns a new path with `id` as its innermost node.
    #[must_use]
    pub fn push(&self, id: NodeId) -> Self {
        ExecutionPath { head: Some(Arc::new(PathNode { id, tail: self.head.clone() })) }
    }

    /// Returns the path without its innermost node.
    pub fn pop(&self) -> Result<Self, EmptyPathError> {
        match &self.head {
            Some(node) => Ok(ExecutionPath { head: node.tail.clone() }),
            None => Err(EmptyPathError),
        }
    }

    /// The innermost node id, if any node is open.
    pub fn head(&self) -> Option<&NodeId> {
        self.head.as_deref().map(|node| &node.id)
    }

    /// The outermost node id: the open test case this chain belongs to.
    pub fn root(&self) -> Option<&NodeId> {
        let mut node = self.head.as_deref()?;
        while let Some(tail) = node.tail.as_deref() {
            node = tail;
        }
        Some(&node.id)
    }

    /// True when the path holds exactly one node, i.e. the current node is
    /// the test case itself.
    pub fn is_root(&self) -> bool {
        match self.head.as_deref() {
            Some(node) => node.tail.is_none(),
            None => false,
        }
    }

    /// True when no node is open.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The number of open nodes on this path.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Iterates over node ids from the innermost node to the root.
    pub fn iter(&self) -> PathIter<'_> {
        PathIter { next: self.head.as_deref() }
    }
}

impl PartialEq for ExecutionPath {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for ExecutionPath {}

/// Iterator over the node ids of an [`ExecutionPath`], innermost first.
pub struct PathIter<'a> {
    next: Option<&'a PathNode>,
}

impl<'a> Iterator for PathIter<'a> {
    type Item = &'a NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.tail.as_deref();
        Some(&node.id)
    }
}
