//! MiniJinja templating for configuration files.
//!
//! Templates are rendered against the [`ContextTree`](crate::context::ContextTree)
//! built from the environment using Jinja2 syntax:
//!
//! ```text
//! [database]
//! url = {{ database.one.url }}
//! {% if auth.ldap._ | boolean %}
//! ldap_user = {{ auth.ldap.username }}
//! {% endif %}
//! ```
//!
//! # Custom Filters
//!
//! - `readfile`: embed a file's contents (`{{ tls.cert.path | readfile }}`)
//! - `boolean`: `true`/`yes`/`on`/`1` as a boolean
//! - `b64encode`, `b64decode`: base64 helpers
//!
//! # Undefined Variables
//!
//! A missing variable renders as an empty string, and so does any attribute
//! chained off it. Filters hand undefined values back unchanged:
//!
//! ```text
//! {{ term.foo.bar }}                      renders ""
//! {{ term.foo.bar | default("none") }}    renders "none"
//! {% if database.two is defined %}...{% endif %}
//! ```
//!
//! With [`RenderConfig::strict_undefined`](crate::config::RenderConfig) set,
//! printing an undefined value fails with [`TemplateError::VariableNotFound`]
//! and close matches are suggested.
//!
//! # Whitespace
//!
//! The first newline after a block tag is removed and leading whitespace
//! before a block tag is stripped, so `{% if %}` lines leave no blank lines
//! behind. A template's final newline is kept.
//!
//! # Includes
//!
//! With a base directory configured, every file below it can be included by
//! its relative path: `{% include "partials/header.conf.j2" %}`.

pub mod error;
pub mod filters;
pub mod renderer;

pub use error::{ErrorLocation, TemplateError};
pub use renderer::TemplateRenderer;
