//! Testing infrastructure for speckit.
//!
//! This module provides the capability traits the pipeline is written
//! against, mocks implementing them, and fixtures for tests.
//!
//! # Architecture
//!
//! - **Traits**: abstractions for subprocesses, confirmation prompts, and task execution
//! - **Mocks**: test doubles that implement the traits with controllable behavior
//! - **Fixtures**: temporary feature directories (test-only)
//!
//! # Example
//!
//! ```rust,ignore
//! use speckit::testing::{MockConfirmation, MockProcessRunner, ProcessOutput};
//!
//! let runner = MockProcessRunner::new()
//!     .with_program("git", ProcessOutput::success(".git\n"));
//! let confirm = MockConfirmation::new().with_answer("yes");
//! ```

#[cfg(test)]
pub mod fixtures;
pub mod mocks;
pub mod traits;

// Re-export commonly used types
#[cfg(test)]
pub use fixtures::*;
pub use mocks::*;
pub use traits::*;
