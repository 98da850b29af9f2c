//! HTTP server module.
//!
//! Exposes the evaluator and the page snapshots as a small REST API, with the
//! live countdown and dashboard refreshes streamed over Server-Sent Events.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query/path parsing and validation                      │
//! │  - JSON serialization, SSE countdown and dashboard        │
//! │  - CORS, compression, error mapping                       │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Eligibility, milestone board, certificates, rewards    │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Chain Layer (chain/)                                     │
//! │  - CourseReader / LocalCourseReader                       │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
