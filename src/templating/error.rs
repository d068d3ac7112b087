//! Template error handling
//!
//! Structured errors for template parsing and rendering, with the source
//! window around the failing line for terminal display.

use std::fmt::Write as _;

/// Template errors with location details
#[derive(Debug)]
pub enum TemplateError {
    /// The template could not be parsed.
    SyntaxError {
        message: String,
        location: Box<ErrorLocation>,
    },

    /// A variable referenced by the template is missing from the context.
    VariableNotFound {
        variable: String,
        suggestions: Box<Vec<String>>,
        location: Box<ErrorLocation>,
    },

    /// Rendering failed for any other reason (filter error, missing include, I/O).
    RenderFailed {
        message: String,
        location: Box<ErrorLocation>,
    },
}

/// Where a template error occurred
#[derive(Debug, Clone, Default)]
pub struct ErrorLocation {
    /// Template name, usually its path
    pub template: String,
    /// 1-based line number if the engine reported one
    pub line_number: Option<usize>,
    /// Lines around the error with their 1-based numbers
    pub context_lines: Vec<(usize, String)>,
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::SyntaxError {
                message,
                location,
            } => {
                write!(f, "Error rendering {}: {}", location.template, message)
            }
            TemplateError::VariableNotFound {
                variable,
                location,
                ..
            } => {
                write!(f, "Error rendering {}: variable '{}' is not defined", location.template, variable)
            }
            TemplateError::RenderFailed {
                message,
                location,
            } => {
                write!(f, "Error rendering {}: {}", location.template, message)
            }
        }
    }
}

impl std::error::Error for TemplateError {}

impl TemplateError {
    pub fn location(&self) -> &ErrorLocation {
        match self {
            TemplateError::SyntaxError {
                location,
                ..
            }
            | TemplateError::VariableNotFound {
                location,
                ..
            }
            | TemplateError::RenderFailed {
                location,
                ..
            } => location,
        }
    }

    /// Generate the full diagnostic: headline, source window and suggestions.
    ///
    /// ```text
    /// Error rendering app.conf.j2: expected an expression
    ///  8:    listen {{ port }}
    ///  9: >> server {{ name + }}
    /// 10:    }
    /// ```
    pub fn format_with_context(&self) -> String {
        let mut msg = self.to_string();

        let window = format_source_window(self.location());
        if !window.is_empty() {
            msg.push('\n');
            msg.push_str(&window);
        }

        if let TemplateError::VariableNotFound {
            suggestions,
            ..
        } = self
        {
            if !suggestions.is_empty() {
                msg.push_str("\nDid you mean: ");
                msg.push_str(&suggestions.join(", "));
            }
        }

        msg
    }
}

/// Formats the lines around an error, marking the failing one with `>>`.
///
/// Line numbers are right-aligned to the width of `line + 1`.
pub fn format_source_window(location: &ErrorLocation) -> String {
    let Some(line) = location.line_number else {
        return String::new();
    };

    let width = (line + 1).to_string().len();
    let mut out = String::new();

    for (number, text) in &location.context_lines {
        if !out.is_empty() {
            out.push('\n');
        }
        if *number == line {
            let _ = write!(out, "{number:>width$}: >> {text}");
        } else {
            let _ = write!(out, "{number:>width$}:    {text}");
        }
    }

    out
}
