//! # Course Gate
//!
//! Milestone gating for an on-chain course and certification platform.
//!
//! A course has three ordered milestones. Its creator may attach a schedule
//! (earliest start per milestone, a minimum gap between completions and a
//! final deadline). This crate decides, from the schedule, a learner's
//! completion timestamps and their enrollment status, whether the next
//! milestone can be completed now, and if not why and until when.
//!
//! ## Architecture
//!
//! - [`models`]: Value types read from the contracts (schedule, progress, ids)
//! - [`services`]: The eligibility evaluator and the views built on it
//! - [`chain`]: Read interface to the contracts and an in-memory reader
//! - [`config`]: Server configuration (defaults, TOML file, environment)
//! - [`http`]: Axum-based HTTP API (feature `http-server`)

// ChainError carries an ErrorContext on every variant
#![allow(clippy::result_large_err)]

pub mod chain;
pub mod config;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
