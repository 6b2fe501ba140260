// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fan-out of run notifications to registered listeners.

use crate::errors::ReportEventError;
use crate::events::StoryEvent;
use std::fmt;

/// A consumer of run notifications.
///
/// Listeners receive every notification of a run, in engine order per
/// worker thread. The report translator is the primary listener; others
/// observe the stream for their own purposes.
pub trait RunListener: Send + Sync {
    /// Handles one notification.
    fn handle_event(&self, event: &StoryEvent) -> Result<(), ReportEventError>;
}

/// Reporter builder.
#[derive(Debug, Default)]
pub struct ReporterBuilder {
    trace: bool,
}

impl ReporterBuilder {
    /// Whether to prepend a listener tracing every notification.
    pub fn set_trace(&mut self, trace: bool) -> &mut Self {
        self.trace = trace;
        self
    }

    /// Creates a reporter dispatching to the given listeners in order.
    pub fn build(&self, listeners: Vec<Box<dyn RunListener>>) -> Reporter {
        let mut listeners = listeners;
        if self.trace {
            listeners.insert(0, Box::new(TraceListener));
        }
        Reporter { listeners }
    }
}

/// Dispatches run notifications to its listeners.
pub struct Reporter {
    listeners: Vec<Box<dyn RunListener>>,
}

impl Reporter {
    /// Reports a notification to every listener, stopping at the first
    /// error.
    pub fn report(&self, event: &StoryEvent) -> Result<(), ReportEventError> {
        for listener in &self.listeners {
            listener.handle_event(event)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter").field("listeners", &self.listeners.len()).finish()
    }
}

/// Logs every notification through `tracing`.
#[derive(Debug)]
pub struct TraceListener;

impl RunListener for TraceListener {
    fn handle_event(&self, event: &StoryEvent) -> Result<(), ReportEventError> {
        match event {
            StoryEvent::BeforeStory { story, given_story } => {
                tracing::info!(path = %story.path, given_story, "story starting");
            }
            StoryEvent::Failed { text, .. } => {
                tracing::warn!(step = %text, "step failed");
            }
            StoryEvent::StoryCancelled { story, duration_secs } => {
                tracing::warn!(path = %story.path, duration_secs, "story cancelled");
            }
            event => {
                tracing::debug!(event = event.name(), "notification");
            }
        }
        Ok(())
    }
}
