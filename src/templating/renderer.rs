//! Template rendering engine with MiniJinja.
//!
//! This module provides the [`TemplateRenderer`] struct that wraps a MiniJinja
//! environment with the configured template loader, custom filters and error
//! translation.

use anyhow::{Result, bail};
use minijinja::value::{Value, ValueKind};
use minijinja::{AutoEscape, Environment, ErrorKind, Template, UndefinedBehavior};
use regex::Regex;
use std::io::Write;
use strsim::levenshtein;

use super::error::{ErrorLocation, TemplateError};
use super::filters;
use crate::config::RenderConfig;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Number of source lines shown on each side of an error line.
const ERROR_WINDOW_LINES: usize = 1;

/// Template renderer with MiniJinja engine and custom filters.
///
/// The renderer holds a prototype environment built once from a
/// [`RenderConfig`]:
///
/// - autoescaping disabled for every template name
/// - `trim_blocks`, `lstrip_blocks` and `keep_trailing_newline` enabled
/// - undefined values chainable (`{{ term.foo.bar }}` renders empty) unless
///   [`RenderConfig::strict_undefined`] is set
/// - custom filters registered
/// - files under the base directory loadable by `{% include %}`
///
/// Each render works on a clone of the prototype, so rendering never mutates
/// shared state and one renderer can serve any number of templates.
#[derive(Clone)]
pub struct TemplateRenderer {
    prototype: Environment<'static>,
}

impl TemplateRenderer {
    /// Create a renderer for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base directory is not a directory.
    pub fn new(config: &RenderConfig) -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(if config.strict_undefined {
            UndefinedBehavior::Strict
        } else {
            UndefinedBehavior::Chainable
        });
        filters::register_filters(&mut env);

        if let Some(base) = &config.base_directory {
            if !base.is_dir() {
                bail!("Template base directory {} is not a directory", base.display());
            }
            tracing::debug!("Loading included templates from {}", base.display());
            env.set_loader(minijinja::path_loader(base));
        }

        Ok(Self {
            prototype: env,
        })
    }

    /// Render a template and stream its output into `out`.
    ///
    /// `name` identifies the template in error messages, usually its path.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] when the template does not parse, references
    /// an undefined variable in strict mode, or fails while rendering.
    pub fn render_to<W: Write>(
        &self,
        name: &str,
        source: &str,
        context: &Value,
        out: W,
    ) -> Result<(), TemplateError> {
        let mut env = self.prototype.clone();

        env.add_template_owned(name.to_string(), source.to_string())
            .map_err(|e| Self::parse_engine_error(&e, name, source, None))?;
        let template =
            env.get_template(name).map_err(|e| Self::parse_engine_error(&e, name, source, None))?;

        template
            .render_to_write(context, out)
            .map_err(|e| Self::parse_engine_error(&e, name, source, Some((&template, context))))?;

        tracing::debug!("Rendered template {}", name);
        Ok(())
    }

    /// Render a template into a string.
    ///
    /// # Errors
    ///
    /// See [`render_to`](Self::render_to).
    pub fn render_str(
        &self,
        name: &str,
        source: &str,
        context: &Value,
    ) -> Result<String, TemplateError> {
        let mut buffer = Vec::new();
        self.render_to(name, source, context, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| TemplateError::RenderFailed {
            message: format!("rendered output is not valid UTF-8: {e}"),
            location: Box::new(ErrorLocation {
                template: name.to_string(),
                ..ErrorLocation::default()
            }),
        })
    }

    /// Parse an engine error into a structured TemplateError
    ///
    /// `rendering` is set once the template compiled and failed while
    /// evaluating against the context.
    fn parse_engine_error(
        error: &minijinja::Error,
        name: &str,
        source: &str,
        rendering: Option<(&Template<'_, '_>, &Value)>,
    ) -> TemplateError {
        let message = Self::format_engine_error(error, name);

        // Errors raised inside an included template point at that template's lines
        let in_this_template = error.name().is_none_or(|n| n == name);
        let mut line_number = error.line().filter(|_| in_this_template);

        let missing = match (error.kind(), rendering) {
            (ErrorKind::UndefinedError, Some((template, context))) if in_this_template => {
                Self::find_missing_variable(template, context, source, line_number)
            }
            _ => None,
        };

        if line_number.is_none() {
            line_number = missing.as_deref().and_then(|var| Self::locate_variable(source, var));
        }

        let context_lines = line_number
            .map(|line| Self::extract_context_lines(source, line, ERROR_WINDOW_LINES))
            .unwrap_or_default();

        let location = Box::new(ErrorLocation {
            template: name.to_string(),
            line_number: line_number.filter(|_| !context_lines.is_empty()),
            context_lines,
        });

        if let (Some(variable), Some((_, context))) = (missing, rendering) {
            let available = Self::extract_available_variables(context);
            let suggestions = Self::find_similar_variables(&variable, &available);
            return TemplateError::VariableNotFound {
                variable,
                suggestions: Box::new(suggestions),
                location,
            };
        }

        match error.kind() {
            ErrorKind::SyntaxError => TemplateError::SyntaxError {
                message,
                location,
            },
            _ => TemplateError::RenderFailed {
                message,
                location,
            },
        }
    }

    /// Readable one-line description of an engine error and its causes.
    ///
    /// ```text
    /// invalid operation: readfile filter failed to read 'tls.pem': No such file or directory (os error 2)
    /// syntax error: unexpected end of input (in partials/header.j2:3)
    /// ```
    fn format_engine_error(error: &minijinja::Error, name: &str) -> String {
        let mut message = match error.detail() {
            Some(detail) => format!("{}: {}", error.kind(), detail),
            None => error.kind().to_string(),
        };

        if let Some(other) = error.name().filter(|n| *n != name) {
            match error.line() {
                Some(line) => message.push_str(&format!(" (in {other}:{line})")),
                None => message.push_str(&format!(" (in {other})")),
            }
        }

        let mut cause = std::error::Error::source(error);
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }

        message
    }

    /// The undefined variable behind a strict-mode failure.
    ///
    /// Candidates are the dotted variables the template reads that do not
    /// resolve in the context. One appearing on the failing line wins.
    fn find_missing_variable(
        template: &Template<'_, '_>,
        context: &Value,
        source: &str,
        line: Option<usize>,
    ) -> Option<String> {
        let mut missing: Vec<String> = template
            .undeclared_variables(true)
            .into_iter()
            .filter(|path| !Self::resolves(context, path))
            .collect();
        missing.sort();

        if let Some(text) = line.and_then(|l| source.lines().nth(l.checked_sub(1)?)) {
            if let Some(found) = missing.iter().find(|var| Self::mentions(text, var)) {
                return Some(found.clone());
            }
        }

        missing.into_iter().next()
    }

    /// Whether a dotted path resolves to a defined value.
    fn resolves(context: &Value, path: &str) -> bool {
        let mut current = context.clone();
        for segment in path.split('.') {
            match current.get_attr(segment) {
                Ok(next) if !next.is_undefined() => current = next,
                _ => return false,
            }
        }
        true
    }

    /// Whether `text` references `variable` as a whole dotted name.
    fn mentions(text: &str, variable: &str) -> bool {
        let pattern = format!(r"(^|[^\w.]){}($|[^\w])", regex::escape(variable));
        Regex::new(&pattern).is_ok_and(|re| re.is_match(text))
    }

    /// 1-based line of the first reference to `variable` in the source.
    fn locate_variable(source: &str, variable: &str) -> Option<usize> {
        source.lines().position(|text| Self::mentions(text, variable)).map(|idx| idx + 1)
    }

    /// Dotted paths of every leaf value in the context
    fn extract_available_variables(context: &Value) -> Vec<String> {
        fn walk(prefix: &str, value: &Value, out: &mut Vec<String>) {
            if value.kind() != ValueKind::Map {
                if !prefix.is_empty() {
                    out.push(prefix.to_string());
                }
                return;
            }

            let Ok(keys) = value.try_iter() else {
                return;
            };
            for key in keys {
                let Some(segment) = key.as_str() else {
                    continue;
                };
                let path = if prefix.is_empty() {
                    segment.to_string()
                } else {
                    format!("{prefix}.{segment}")
                };
                if let Ok(child) = value.get_item(&key) {
                    walk(&path, &child, out);
                }
            }
        }

        let mut vars = Vec::new();
        walk("", context, &mut vars);
        vars
    }

    /// Find similar variable names using Levenshtein distance
    fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> =
            available.iter().map(|var| (var.clone(), levenshtein(target, var))).collect();

        // Closest first, ties alphabetical
        scored.sort_by(|(a, da), (b, db)| da.cmp(db).then_with(|| a.cmp(b)));

        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(var, _)| var)
            .collect()
    }

    /// Extract context lines around an error location
    ///
    /// Returns up to `context_size` lines before and after the error line,
    /// along with their line numbers (1-indexed).
    fn extract_context_lines(
        content: &str,
        error_line: usize,
        context_size: usize,
    ) -> Vec<(usize, String)> {
        let lines: Vec<&str> = content.lines().collect();
        let total_lines = lines.len();

        if error_line == 0 || error_line > total_lines {
            return Vec::new();
        }

        let start = error_line.saturating_sub(context_size + 1);
        let end = (error_line + context_size).min(total_lines);

        lines[start..end]
            .iter()
            .enumerate()
            .map(|(idx, line)| (start + idx + 1, line.to_string()))
            .collect()
    }
}
