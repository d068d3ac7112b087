//! Error handling for envtmpl
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`EnvtmplError`], [`ContextError`], [`TemplateError`])
//!    for precise handling in code
//! 2. **User-friendly messages** ([`ErrorContext`]) with actionable suggestions for CLI users
//!
//! Use [`user_friendly_error`] to turn any `anyhow::Error` produced by a render
//! into something worth printing.
//!
//! # Examples
//!
//! ```rust,no_run
//! use envtmpl_cli::core::{EnvtmplError, ErrorContext};
//!
//! let context = ErrorContext::new(EnvtmplError::TemplateNotFound {
//!     path: "app.conf.j2".to_string(),
//! })
//! .with_suggestion("Check the template path");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::context::ContextError;
use crate::templating::TemplateError;

/// The main error type for envtmpl operations outside template evaluation.
#[derive(Error, Debug)]
pub enum EnvtmplError {
    /// The template file or directory does not exist.
    #[error("Template not found: {path}")]
    TemplateNotFound {
        /// Path as given on the command line
        path: String,
    },

    /// A directory render was pointed at an output that is a file.
    #[error("Output path {path} already exists and is not a directory")]
    OutputNotDirectory {
        /// Output path
        path: String,
    },

    /// A file system operation failed.
    #[error("File system error: {operation} failed for {path}")]
    FileSystemError {
        /// Operation that failed ("write", "read", "remove", ...)
        operation: String,
        /// Path involved
        path: String,
    },

    /// Building the template context from variables failed.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Any other error with a ready-made message.
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error wrapper with details and a suggestion for terminal display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: EnvtmplError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: EnvtmplError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: red and bold
    /// - Details: printed as-is below the error (source windows keep their alignment)
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{details}");
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n{details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Converts any error into an [`ErrorContext`] with suggestions.
///
/// The error chain is searched for the typed errors of this crate first; I/O
/// errors and anything else fall back to a generic message that keeps the
/// whole chain as details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    for cause in error.chain() {
        if let Some(err) = cause.downcast_ref::<EnvtmplError>() {
            return create_error_context(err);
        }

        if let Some(ContextError::DuplicateKey {
            key,
            path,
        }) = cause.downcast_ref::<ContextError>()
        {
            return ErrorContext::new(EnvtmplError::Context(ContextError::DuplicateKey {
                key: key.clone(),
                path: path.clone(),
            }))
            .with_suggestion(format!(
                "Rename or unset one of the variables that resolve to '{path}'"
            ));
        }

        if let Some(template_error) = cause.downcast_ref::<TemplateError>() {
            let formatted = template_error.format_with_context();
            let (headline, window) = match formatted.split_once('\n') {
                Some((headline, window)) => (headline.to_string(), Some(window.to_string())),
                None => (formatted, None),
            };

            let mut ctx = ErrorContext::new(EnvtmplError::Other {
                message: headline,
            });
            if let Some(window) = window {
                ctx = ctx.with_details(window);
            }
            return match template_error {
                TemplateError::VariableNotFound {
                    ..
                } => ctx.with_suggestion(
                    "Export the variable, or guard the lookup with `| default(\"\")` or `is defined`",
                ),
                _ => ctx,
            };
        }

        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            if io_error.kind() == std::io::ErrorKind::PermissionDenied {
                return ErrorContext::new(EnvtmplError::Other {
                    message: error.to_string(),
                })
                .with_details(format_chain(&error))
                .with_suggestion("Check file ownership and permissions of the template and output paths");
            }
        }
    }

    ErrorContext::new(EnvtmplError::Other {
        message: error.to_string(),
    })
    .with_details(format_chain(&error))
}

fn create_error_context(error: &EnvtmplError) -> ErrorContext {
    match error {
        EnvtmplError::TemplateNotFound {
            path,
        } => ErrorContext::new(EnvtmplError::TemplateNotFound {
            path: path.clone(),
        })
        .with_suggestion("Check that the template file or directory exists"),
        EnvtmplError::OutputNotDirectory {
            path,
        } => ErrorContext::new(EnvtmplError::OutputNotDirectory {
            path: path.clone(),
        })
        .with_suggestion("Point --output at a directory when rendering a template directory"),
        EnvtmplError::FileSystemError {
            operation,
            path,
        } => ErrorContext::new(EnvtmplError::FileSystemError {
            operation: operation.clone(),
            path: path.clone(),
        }),
        EnvtmplError::Context(ContextError::DuplicateKey {
            key,
            path,
        }) => ErrorContext::new(EnvtmplError::Context(ContextError::DuplicateKey {
            key: key.clone(),
            path: path.clone(),
        }))
        .with_suggestion(format!("Rename or unset one of the variables that resolve to '{path}'")),
        EnvtmplError::Other {
            message,
        } => ErrorContext::new(EnvtmplError::Other {
            message: message.clone(),
        }),
    }
}

/// Indented list of the causes below the top-level error.
fn format_chain(error: &anyhow::Error) -> String {
    error.chain().skip(1).map(|cause| format!("  caused by: {cause}")).collect::<Vec<_>>().join("\n")
}
