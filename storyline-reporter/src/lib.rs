// Copyright (c) The storyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle-to-report translation for storyline.
//!
//! This crate consumes the ordered story/scenario/step notifications of a
//! run engine and drives the `storyline-report` backend so that every
//! scenario execution is written as one report test case, with synthetic
//! lifecycle cases, bracket steps and given-story nesting woven in where
//! the run shape calls for them.
//!
//! The entry points are [`translator::StoryReporter`], the listener doing
//! the translation, and [`reporter::ReporterBuilder`], which fans the
//! event stream out to a set of [`reporter::RunListener`]s.

#![warn(missing_docs)]

pub mod config;
pub mod context;
mod env;
pub mod errors;
pub mod events;
pub mod failure;
pub mod labels;
pub mod path;
pub mod reporter;
pub mod run_model;
pub mod stage;
pub mod translator;
