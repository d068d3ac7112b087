//! Rendering of template files and template directories.
//!
//! [`Renderer`] ties a [`TemplateRenderer`], the [`RenderConfig`] and one built
//! context together and walks the file system.
//!
//! # Directory Layout
//!
//! ```text
//! templates/
//! ├── app.conf.j2            -> out/app.conf
//! ├── notes.txt              (ignored: not a template)
//! ├── server.conf.j2         -> out/server.conf = server.conf.j2
//! ├── server.conf.j2.d/         + 10-listen.j2
//! │   ├── 10-listen.j2          + 20-tls.j2
//! │   └── 20-tls.j2
//! ├── extra.conf.j2.d/       -> out/extra.conf = fragments only
//! │   └── 00-base.j2
//! └── sites/                 -> out/sites/... (only with --recursive)
//!     └── default.conf.j2
//! ```
//!
//! Entries are processed in file-name order, and fragments within a `.d`
//! directory are concatenated in file-name order. Without an output path
//! everything is streamed to stdout in the same order.
//!
//! Output files are written atomically once fully rendered, so a failing
//! template never leaves a truncated file behind.

use anyhow::{Context, Result};
use minijinja::Value;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::RenderConfig;
use crate::core::EnvtmplError;
use crate::templating::TemplateRenderer;
use crate::utils::fs::{atomic_write, ensure_dir, remove_file_if_exists};

/// Extension marking a fragment directory.
const FRAGMENT_DIR_EXTENSION: &str = "d";

/// Renders templates against one context.
pub struct Renderer<'a> {
    engine: &'a TemplateRenderer,
    config: &'a RenderConfig,
    context: &'a Value,
}

impl<'a> Renderer<'a> {
    pub fn new(engine: &'a TemplateRenderer, config: &'a RenderConfig, context: &'a Value) -> Self {
        Self {
            engine,
            config,
            context,
        }
    }

    /// Render a template file or directory.
    ///
    /// A file renders to `output` (or stdout). A directory renders each of its
    /// templates into the `output` directory (or stdout), creating it if needed.
    ///
    /// # Errors
    ///
    /// Fails if the template does not exist, a directory output points at a
    /// file, a template fails to render, or output cannot be written.
    pub fn render(&self, template: &Path, output: Option<&Path>) -> Result<()> {
        if !template.exists() {
            return Err(EnvtmplError::TemplateNotFound {
                path: template.display().to_string(),
            }
            .into());
        }

        if template.is_dir() {
            self.render_directory(template, output)
        } else {
            self.render_file(template, output)
        }
    }

    fn render_directory(&self, dir: &Path, output: Option<&Path>) -> Result<()> {
        if let Some(out) = output {
            if out.exists() && !out.is_dir() {
                return Err(EnvtmplError::OutputNotDirectory {
                    path: out.display().to_string(),
                }
                .into());
            }
            ensure_dir(out)?;
        }

        tracing::debug!("Rendering directory {}", dir.display());

        for path in sorted_entries(dir)? {
            let Some(file_name) = path.file_name().map(|n| n.to_os_string()) else {
                continue;
            };

            if path.is_dir() {
                if let Some(base_template) = self.fragment_base_template(&path) {
                    let target = output.and_then(|out| {
                        base_template.file_stem().map(|stem| out.join(stem))
                    });
                    self.render_fragments(&path, &base_template, target.as_deref())?;
                } else if self.config.recursive {
                    let target = output.map(|out| out.join(&file_name));
                    self.render_directory(&path, target.as_deref())?;
                } else {
                    tracing::debug!("Skipping subdirectory {} (not recursive)", path.display());
                }
            } else if self.config.is_template(&path) {
                if fragment_dir_for(&path).is_dir() {
                    // Rendered as the base of its fragment directory
                    continue;
                }
                let target = output.and_then(|out| path.file_stem().map(|stem| out.join(stem)));
                self.render_file(&path, target.as_deref())?;
            }
        }

        Ok(())
    }

    /// For `<name>.<ext>.d` with a template `<ext>`, the path of `<name>.<ext>`.
    fn fragment_base_template(&self, dir: &Path) -> Option<PathBuf> {
        if dir.extension().and_then(|ext| ext.to_str()) != Some(FRAGMENT_DIR_EXTENSION) {
            return None;
        }

        let base = dir.with_extension("");
        self.config.is_template(&base).then_some(base)
    }

    fn render_fragments(
        &self,
        fragment_dir: &Path,
        base_template: &Path,
        output: Option<&Path>,
    ) -> Result<()> {
        let fragments: Vec<PathBuf> = sorted_entries(fragment_dir)?
            .into_iter()
            .filter(|path| path.is_file() && self.config.is_template(path))
            .collect();
        let base = base_template.is_file().then_some(base_template);

        match output {
            Some(out) => {
                if base.is_none() && fragments.is_empty() {
                    if remove_file_if_exists(out)? {
                        tracing::info!("Removed stale {} (no base template or fragments)", out.display());
                    }
                    return Ok(());
                }

                tracing::info!("Rendering {} to {}", fragment_dir.display(), out.display());
                let mut buffer = Vec::new();
                for part in base.into_iter().chain(fragments.iter().map(PathBuf::as_path)) {
                    self.render_into(part, &mut buffer)?;
                }
                write_output(out, &buffer)
            }
            None => {
                tracing::info!("Rendering {}", fragment_dir.display());
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                for part in base.into_iter().chain(fragments.iter().map(PathBuf::as_path)) {
                    self.render_into(part, &mut lock)?;
                }
                lock.flush().context("Failed to flush stdout")
            }
        }
    }

    fn render_file(&self, template: &Path, output: Option<&Path>) -> Result<()> {
        match output {
            Some(out) => {
                tracing::info!("Rendering {} to {}", template.display(), out.display());
                let mut buffer = Vec::new();
                self.render_into(template, &mut buffer)?;
                write_output(out, &buffer)
            }
            None => {
                tracing::info!("Rendering {}", template.display());
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                self.render_into(template, &mut lock)?;
                lock.flush().context("Failed to flush stdout")
            }
        }
    }

    fn render_into<W: Write>(&self, template: &Path, out: &mut W) -> Result<()> {
        let source = fs::read_to_string(template)
            .with_context(|| format!("Failed to read template {}", template.display()))?;

        self.engine.render_to(&template.display().to_string(), &source, self.context, out)?;
        Ok(())
    }
}

fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    atomic_write(path, content).map_err(|e| {
        e.context(EnvtmplError::FileSystemError {
            operation: "write".to_string(),
            path: path.display().to_string(),
        })
    })
}

/// `<template>.d`, the fragment directory belonging to a template file.
fn fragment_dir_for(template: &Path) -> PathBuf {
    let mut name = OsString::from(template.as_os_str());
    name.push(".");
    name.push(FRAGMENT_DIR_EXTENSION);
    PathBuf::from(name)
}

/// Direct children of `dir`, sorted by file name and collected up front so
/// in-place renders do not see their own outputs.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| {
            entry
                .map(walkdir::DirEntry::into_path)
                .with_context(|| format!("Failed to read directory {}", dir.display()))
        })
        .collect()
}
