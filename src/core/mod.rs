//! Core error types for envtmpl
//!
//! - [`EnvtmplError`] - typed failures of the render pipeline
//! - [`ErrorContext`] - user-facing wrapper with details and suggestions
//! - [`user_friendly_error`] - convert any `anyhow::Error` for CLI display

pub mod error;

pub use error::{EnvtmplError, ErrorContext, user_friendly_error};
