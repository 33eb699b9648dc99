//! Integration test utilities for the ResQ admin API
//!
//! Helpers for running end-to-end tests against the REST API and the
//! WebSocket live feed, plus fixtures that seed PostgreSQL directly.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
