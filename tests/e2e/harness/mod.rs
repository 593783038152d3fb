//! E2E test harness for errlist.
//!
//! This module contains test infrastructure with builders, variants, and
//! methods that not every scenario uses.

#![allow(dead_code)]

pub mod runner;
pub mod workspace;

// Re-export commonly used types
pub use assertions::{Assertion, StatusMatch, View};
pub use scenario::Scenario;
