//! Render configuration and environment loading.
//!
//! [`RenderConfig`] is built once from command-line arguments and passed by
//! reference to the template engine and the directory walker. Nothing in the
//! crate keeps engine state in globals.
//!
//! # Template Extensions
//!
//! Files are treated as templates when their extension is in the configured
//! list. The list is given as a comma-separated string, either through
//! `--template-extensions` or the `ENVTMPL_TEMPLATE_EXTENSIONS` variable:
//!
//! ```bash
//! ENVTMPL_TEMPLATE_EXTENSIONS=tmpl,j2 envtmpl -o /etc/app /etc/app/templates
//! ```

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extensions recognised as templates when none are configured.
pub const DEFAULT_TEMPLATE_EXTENSIONS: &str = "tmpl,jinja,jinja2,jnj,j2";

/// Environment variable overriding the template extension list.
pub const TEMPLATE_EXTENSIONS_ENV: &str = "ENVTMPL_TEMPLATE_EXTENSIONS";

/// Immutable settings shared by every render of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Template file extensions, without the leading dot.
    pub template_extensions: Vec<String>,
    /// Directory whose files can be included by relative name.
    pub base_directory: Option<PathBuf>,
    /// Descend into plain subdirectories when rendering a directory.
    pub recursive: bool,
    /// Fail on undefined variables instead of rendering them empty.
    ///
    /// Off by default: `{{ missing }}` and `{{ term.foo.bar }}` render as empty
    /// strings and can be tested with `is defined` or replaced with `default`.
    pub strict_undefined: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template_extensions: parse_template_extensions(DEFAULT_TEMPLATE_EXTENSIONS),
            base_directory: None,
            recursive: false,
            strict_undefined: false,
        }
    }
}

impl RenderConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the template extension list from a comma-separated string.
    #[must_use]
    pub fn with_template_extensions(mut self, list: &str) -> Self {
        self.template_extensions = parse_template_extensions(list);
        self
    }

    #[must_use]
    pub fn with_base_directory(mut self, dir: Option<PathBuf>) -> Self {
        self.base_directory = dir;
        self
    }

    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    #[must_use]
    pub fn with_strict_undefined(mut self, strict: bool) -> Self {
        self.strict_undefined = strict;
        self
    }

    /// Whether `ext` (without dot) is a template extension.
    pub fn is_template_extension(&self, ext: &str) -> bool {
        self.template_extensions.iter().any(|known| known == ext)
    }

    /// Whether the file name of `path` ends in a template extension.
    pub fn is_template(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.is_template_extension(ext))
    }
}

/// Splits a comma-separated extension list, dropping blanks and leading dots.
///
/// # Examples
///
/// ```rust
/// use envtmpl_cli::config::parse_template_extensions;
///
/// assert_eq!(parse_template_extensions("tmpl, .j2,,"), ["tmpl", "j2"]);
/// ```
pub fn parse_template_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(|ext| ext.trim().trim_start_matches('.'))
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collects environment pairs into a sorted map of UTF-8 strings.
///
/// Pairs that are not valid UTF-8 cannot be addressed from templates and are
/// skipped with a warning. The sorted order fixes which key gets reported when
/// two variables collide.
pub fn environment_entries<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut entries = BTreeMap::new();

    for (key, value) in vars {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => {
                entries.insert(key, value);
            }
            (Ok(key), Err(_)) => {
                tracing::warn!("Skipping environment variable '{}': value is not valid UTF-8", key);
            }
            (Err(key), _) => {
                tracing::warn!(
                    "Skipping environment variable '{}': name is not valid UTF-8",
                    key.to_string_lossy()
                );
            }
        }
    }

    entries
}

/// Reads the current process environment.
pub fn load_environment() -> BTreeMap<String, String> {
    environment_entries(std::env::vars_os())
}
