//! envtmpl - render configuration templates from environment variables
//!
//! Environment variables are flat strings. Configuration files are not. envtmpl
//! folds the environment into a nested context and renders Jinja-style
//! templates against it, one file at a time or a whole directory at once.
//!
//! # Architecture Overview
//!
//! A run is a straight pipeline:
//! 1. the process environment is collected into a sorted mapping ([`config`])
//! 2. the mapping is folded into a [`ContextTree`](context::ContextTree) ([`context`])
//! 3. templates are rendered with a [`TemplateRenderer`](templating::TemplateRenderer)
//!    ([`templating`]), walking directories and fragment directories ([`render`])
//! 4. outputs are written atomically ([`utils`])
//!
//! ## Key Naming
//!
//! Names are split on `_` and on lowercase-to-uppercase boundaries, then
//! lowercased:
//!
//! | Variable | Template path |
//! |----------|---------------|
//! | `DATABASE_ONE_URL` | `database.one.url` |
//! | `camelCaseVariable` | `camel.case.variable` |
//! | `TERM` and `TERM_PROGRAM` | `term._` and `term.program` |
//!
//! Two variables that land on the same path (`ONE_TWO` and `oneTwo`) are an
//! error, reported before anything is rendered.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - Render settings and environment loading
//! - [`context`] - Variable name canonicalisation and the context tree
//! - [`core`] - Error types and user-facing error display
//! - [`render`] - File, directory and fragment directory rendering
//! - [`templating`] - MiniJinja engine setup, custom filters and template errors
//! - [`utils`] - Atomic file writes and directory helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use envtmpl_cli::config::{RenderConfig, load_environment};
//! use envtmpl_cli::context::ContextTree;
//! use envtmpl_cli::render::Renderer;
//! use envtmpl_cli::templating::TemplateRenderer;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = RenderConfig::new().with_recursive(true);
//! let context = ContextTree::build(load_environment())?.to_template_context();
//! let engine = TemplateRenderer::new(&config)?;
//!
//! Renderer::new(&engine, &config, &context)
//!     .render(Path::new("templates"), Some(Path::new("/etc/app")))?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod render;
pub mod templating;
pub mod utils;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
