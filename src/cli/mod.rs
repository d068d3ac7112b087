//! Command-line interface for envtmpl.
//!
//! `envtmpl` renders a template file, or a directory of templates, against the
//! process environment:
//!
//! ```bash
//! # Render one file to stdout
//! DATABASE_ONE_URL=postgres://db envtmpl app.conf.j2
//!
//! # Render a directory (and its subdirectories) into /etc/app
//! envtmpl --recursive --output /etc/app templates/
//!
//! # Render in place, with shared partials available to {% include %}
//! envtmpl -b partials/ -o /etc/nginx /etc/nginx
//! ```
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output, including every "Rendering X to Y"
//! - `--quiet` - Suppress all output except errors
//! - `--template-extensions` - Which file extensions count as templates
//! - `--strict-undefined` - Treat undefined variables as errors
//!
//! Logging goes to stderr. Stdout only ever carries rendered output.


use anyhow::Result;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::{self, DEFAULT_TEMPLATE_EXTENSIONS, RenderConfig, TEMPLATE_EXTENSIONS_ENV};
use crate::context::ContextTree;
use crate::render::Renderer;
use crate::templating::TemplateRenderer;

/// Runtime configuration for CLI execution.
///
/// Holds what would otherwise be read from global state, so tests and
/// programmatic callers control logging without touching the environment.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set.
    ///
    /// - `"error"`: `--quiet`
    /// - `"warn"`: default
    /// - `"debug"`: `--verbose`
    pub log_level: Option<String>,
}

impl CliConfig {
    /// Create a new CLI configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` wins over the configured level. Output goes to stderr.
    /// Calling this more than once is harmless.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("warn"))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Render Jinja-style templates from environment variables.
///
/// Every environment variable is available to templates under a nested name:
/// `DATABASE_ONE_URL` becomes `database.one.url`, `camelCaseVariable` becomes
/// `camel.case.variable`. When a variable is both a value and a prefix of
/// longer names, its own value is reachable as `_` (`term._`).
#[derive(Parser, Debug)]
#[command(
    name = "envtmpl",
    about = "Render templates from environment variables",
    version,
    author,
    long_about = "envtmpl renders Jinja-style templates using environment variables, \
                  nested by their underscore and camelCase boundaries."
)]
pub struct Cli {
    /// Template file or directory of templates to render.
    template: PathBuf,

    /// Descend into subdirectories when rendering a directory.
    #[arg(short, long)]
    recursive: bool,

    /// Output file, or output directory when rendering a directory.
    ///
    /// Defaults to stdout. May point at the template directory itself to
    /// render in place.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory whose files can be referenced by `{% include %}`.
    #[arg(short = 'b', long)]
    template_base_directory: Option<PathBuf>,

    /// Comma separated list of template file extensions.
    #[arg(long, env = TEMPLATE_EXTENSIONS_ENV, default_value = DEFAULT_TEMPLATE_EXTENSIONS)]
    template_extensions: String,

    /// Fail on undefined variables instead of rendering them empty.
    #[arg(long)]
    strict_undefined: bool,

    /// Enable verbose output, including each file as it is rendered.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Execute against the process environment.
    ///
    /// # Errors
    ///
    /// Returns any context, template or file system error. Nothing partial is
    /// written for the failing output.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_environment(config::load_environment())
    }

    /// Build a [`CliConfig`] from the parsed flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
        }
    }

    /// Build the [`RenderConfig`] from the parsed flags.
    #[must_use]
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::new()
            .with_template_extensions(&self.template_extensions)
            .with_base_directory(self.template_base_directory.clone())
            .with_recursive(self.recursive)
            .with_strict_undefined(self.strict_undefined)
    }

    /// Execute against an explicit variable mapping.
    ///
    /// The context is built and converted once, then shared by every template
    /// of the run.
    ///
    /// # Errors
    ///
    /// Fails with [`ContextError::DuplicateKey`](crate::context::ContextError)
    /// before anything is rendered, or with the first render failure.
    pub fn execute_with_environment(self, variables: BTreeMap<String, String>) -> Result<()> {
        let config = self.render_config();

        tracing::debug!("Building context from {} variables", variables.len());
        let tree = ContextTree::build(variables)?;
        tracing::trace!("Context paths: {}", tree.paths().join(", "));
        let context = tree.to_template_context();

        let engine = TemplateRenderer::new(&config)?;
        Renderer::new(&engine, &config, &context).render(&self.template, self.output.as_deref())
    }
}
