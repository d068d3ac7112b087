//! Common test utilities for envtmpl integration tests

// Not every helper is used by every test file
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Variables the binary sees in most tests, with a cleared environment.
pub const ENVIRONMENT: &[(&str, &str)] = &[
    ("LANG", "en_US.UTF-8"),
    ("EDITOR", "vim"),
    ("TERM", "xterm-256color"),
    ("TERM_PROGRAM", "vscode"),
    ("camelCaseVariable", "handlethistoo"),
    ("DATABASE_ONE_URL", "postgres://db.internal/app"),
    ("HTTP_PORT", "8080"),
];

/// A temporary directory of templates and outputs.
pub struct TestProject {
    temp: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Absolute path of `relative` inside the project.
    pub fn join(&self, relative: &str) -> PathBuf {
        self.temp.path().join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(&path, content).expect("failed to write file");
        path
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.join(relative);
        fs::create_dir_all(&path).expect("failed to create dir");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.join(relative))
            .unwrap_or_else(|e| panic!("failed to read {relative}: {e}"))
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.join(relative).exists()
    }

    /// `envtmpl` running in the project with only [`ENVIRONMENT`] set.
    pub fn envtmpl(&self) -> Command {
        self.envtmpl_with(ENVIRONMENT)
    }

    /// `envtmpl` running in the project with exactly `vars` set.
    pub fn envtmpl_with(&self, vars: &[(&str, &str)]) -> Command {
        let mut cmd = Command::cargo_bin("envtmpl").expect("envtmpl binary");
        cmd.current_dir(self.path()).env_clear().envs(vars.iter().copied());
        cmd
    }
}

/// Typical directory with a template, a non-template and a subdirectory.
pub fn simple_directory(project: &TestProject, root: &str) {
    project.write(&format!("{root}/test.conf.jinja"), "lang={{ lang }}\n");
    project.write(&format!("{root}/README.md"), "# not a template {{\n");
    project.write(&format!("{root}/simple-subdirectory/test.sub.jinja"), "editor={{ editor }}\n");
}

/// Directory using fragment (`.d`) directories.
pub fn fragment_directory(project: &TestProject, root: &str) {
    project.write(&format!("{root}/test.conf.jinja"), "# base {{ term._ }}\n");
    project.write(
        &format!("{root}/test.conf.jinja.d/fragment.jinja"),
        "program={{ term.program }}\n",
    );
    project.write(&format!("{root}/test.conf.jinja.d/fragment2.conf.jinja"), "lang={{ lang }}\n");
    project.write(&format!("{root}/test.conf.jinja.d/notes.txt"), "ignored\n");
    project.write(&format!("{root}/nobase.conf.jinja.d/nobase.conf.jinja"), "editor={{ editor }}\n");
    project.write(&format!("{root}/fragment-subdirectory/sub.conf.jinja"), "sub\n");
    project.write(&format!("{root}/fragment-subdirectory/sub.conf.jinja.d/a.jinja"), "a\n");
}
