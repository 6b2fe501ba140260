// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-thread reporting state.
//!
//! Run engines execute stories on worker threads and deliver each
//! thread's notifications in order. The reporter keeps one
//! [`ThreadState`] per worker, checked out for the duration of a single
//! notification and checked back in afterwards.

use crate::errors::{NoActiveStoryError, StatePoisonedError};
use crate::path::ExecutionPath;
use crate::run_model::RunningStory;
use crate::stage::StageTracker;
use std::collections::HashMap;
use std::sync::Mutex;
use std::thread::{self, ThreadId};

/// The reporting state of one worker thread.
#[derive(Clone, Debug, Default)]
pub struct ThreadState {
    /// The open report nodes, root test case first.
    pub path: ExecutionPath,
    /// Story and scenario stages plus the active label sets.
    pub stages: StageTracker,
    /// The story nesting stack, root story first.
    pub stories: Vec<RunningStory>,
}

impl ThreadState {
    /// The innermost running story.
    pub fn current_story(&self) -> Result<&RunningStory, NoActiveStoryError> {
        self.stories.last().ok_or(NoActiveStoryError)
    }

    /// The innermost running story, mutably.
    pub fn current_story_mut(&mut self) -> Result<&mut RunningStory, NoActiveStoryError> {
        self.stories.last_mut().ok_or(NoActiveStoryError)
    }

    /// The root story of the nesting stack, if any story is running.
    pub fn root_story(&self) -> Option<&RunningStory> {
        self.stories.first()
    }
}

/// A keyed slot store holding one value per thread.
///
/// [`take`](Self::take) checks a value out, removing it from the store;
/// the caller mutates it freely and checks it back in with
/// [`put`](Self::put). A thread that never checked in gets the default
/// value.
#[derive(Debug)]
pub struct ContextStore<T> {
    slots: Mutex<HashMap<ThreadId, T>>,
}

impl<T> Default for ContextStore<T> {
    fn default() -> Self {
        ContextStore { slots: Mutex::new(HashMap::new()) }
    }
}

impl<T: Default> ContextStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks out the calling thread's value, or a default if none is
    /// stored.
    pub fn take(&self) -> Result<T, StatePoisonedError> {
        let mut slots = self.slots.lock().map_err(|_| StatePoisonedError)?;
        Ok(slots.remove(&thread::current().id()).unwrap_or_default())
    }

    /// Checks the calling thread's value back in.
    pub fn put(&self, value: T) -> Result<(), StatePoisonedError> {
        let mut slots = self.slots.lock().map_err(|_| StatePoisonedError)?;
        slots.insert(thread::current().id(), value);
        Ok(())
    }

    /// Discards the calling thread's value, returning it if one was
    /// stored.
    pub fn remove(&self) -> Result<Option<T>, StatePoisonedError> {
        let mut slots = self.slots.lock().map_err(|_| StatePoisonedError)?;
        Ok(slots.remove(&thread::current().id()))
    }
}
