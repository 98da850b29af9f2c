//! Contract read layer.
//!
//! Course state lives in the course manager and certificate contracts. This
//! module defines the read interface the services depend on, its error type,
//! and an in-memory implementation for tests and local development.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Services (tracker, dashboard)                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  CourseReader trait (reader.rs)                          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │        LocalCourseReader (in-memory)          │
//!     └──────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod local;
pub mod reader;

pub use error::{ChainError, ChainResult, ErrorContext};
pub use local::{Enrollment, EnrollmentFixture, Fixtures, LocalCourseReader, TokenFixture};
pub use reader::CourseReader;
