// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Report tree data model and backend for storyline.
//!
//! This crate defines the report nodes produced by a story run (test cases
//! with nested steps, labels, links, parameters and attachments), the
//! [`ReportBackend`] protocol used to build them incrementally, and the
//! pieces that persist finalized results: an in-memory [`ReportStore`], a
//! JSON [`ResultsWriter`], and a [`ReportSession`] managing the results
//! directory.
//!
//! The crate knows nothing about the run engine that drives it; see the
//! `storyline-reporter` crate for the lifecycle-to-report translation.

mod errors;
mod model;
mod recording;
mod session;
mod status;
mod store;
mod writer;

pub use errors::*;
pub use model::*;
pub use recording::*;
pub use session::*;
pub use status::*;
pub use store::*;
pub use writer::*;
