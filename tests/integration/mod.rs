//! Integration test suite for envtmpl
//!
//! End-to-end tests driving the `envtmpl` binary with a cleared environment.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **render_file**: single templates, filters and includes
//! - **render_directory**: directories, recursion, fragments and in-place renders
//! - **error_scenarios**: duplicate keys, template errors and bad paths

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod error_scenarios;
mod render_directory;
mod render_file;
