// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host and thread naming for report labels.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Environment variable overriding the reported host name.
pub(crate) const HOSTNAME_OVERRIDE: &str = "STORYLINE_HOSTNAME";

/// The host name reported in labels: the override variable if set, else
/// the OS host name, else a fixed fallback.
pub(crate) fn host_name() -> String {
    if let Ok(name) = std::env::var(HOSTNAME_OVERRIDE) {
        if !name.is_empty() {
            return name;
        }
    }
    whoami::hostname().unwrap_or_else(|_| "unknown-host".to_owned())
}

static NEXT_THREAD_ORDINAL: AtomicUsize = AtomicUsize::new(1);

thread_local! {
    static THREAD_TOKEN: String = match std::thread::current().name() {
        Some(name) => name.to_owned(),
        None => format!("thread-{}", NEXT_THREAD_ORDINAL.fetch_add(1, Ordering::Relaxed)),
    };
}

/// A stable per-thread token: the thread name, or an ordinal for unnamed
/// threads. Also keys step ids, so it must not change for the lifetime of
/// the thread.
pub(crate) fn thread_token() -> String {
    THREAD_TOKEN.with(Clone::clone)
}

pub(crate) fn timeout_message(duration_secs: u64) -> String {
    format!("Story timed out after {duration_secs}s")
}
