//! Rendering template directories, recursion and fragment directories.

use crate::common::{TestProject, fragment_directory, simple_directory};
use predicates::prelude::*;

#[test]
fn test_simple_directory() {
    let project = TestProject::new();
    simple_directory(&project, "templates");

    project.envtmpl().args(["-o", "out", "templates"]).assert().success();

    assert_eq!(project.read("out/test.conf"), "lang=en_US.UTF-8\n");
    assert!(!project.exists("out/README"));
    assert!(!project.exists("out/README.md"));
    assert!(!project.exists("out/simple-subdirectory"));
}

#[test]
fn test_simple_directory_recursive() {
    let project = TestProject::new();
    simple_directory(&project, "templates");

    project.envtmpl().args(["--recursive", "-o", "out", "templates"]).assert().success();

    assert_eq!(project.read("out/test.conf"), "lang=en_US.UTF-8\n");
    assert_eq!(project.read("out/simple-subdirectory/test.sub"), "editor=vim\n");
}

#[test]
fn test_simple_directory_inplace() {
    let project = TestProject::new();
    simple_directory(&project, "templates");

    project.envtmpl().args(["-r", "-o", "templates", "templates"]).assert().success();

    assert_eq!(project.read("templates/test.conf"), "lang=en_US.UTF-8\n");
    assert_eq!(project.read("templates/simple-subdirectory/test.sub"), "editor=vim\n");
    assert_eq!(project.read("templates/test.conf.jinja"), "lang={{ lang }}\n");
}

#[test]
fn test_directory_to_stdout_in_name_order() {
    let project = TestProject::new();
    project.write("templates/b.jinja", "second\n");
    project.write("templates/a.jinja", "first\n");
    project.write("templates/c.txt", "never\n");

    project.envtmpl().arg("templates").assert().success().stdout("first\nsecond\n");
}

#[test]
fn test_fragment_directory() {
    let project = TestProject::new();
    fragment_directory(&project, "templates");

    project.envtmpl().args(["-o", "out", "templates"]).assert().success();

    assert_eq!(
        project.read("out/test.conf"),
        "# base xterm-256color\nprogram=vscode\nlang=en_US.UTF-8\n"
    );
    assert_eq!(project.read("out/nobase.conf"), "editor=vim\n");
    assert!(!project.exists("out/fragment-subdirectory"));
}

#[test]
fn test_fragment_directory_recursive() {
    let project = TestProject::new();
    fragment_directory(&project, "templates");

    project.envtmpl().args(["-r", "-o", "out", "templates"]).assert().success();

    assert_eq!(project.read("out/fragment-subdirectory/sub.conf"), "sub\na\n");
}

#[test]
fn test_fragment_directory_inplace_is_repeatable() {
    let project = TestProject::new();
    fragment_directory(&project, "templates");

    for _ in 0..2 {
        project.envtmpl().args(["-o", "templates", "templates"]).assert().success();
    }

    assert_eq!(
        project.read("templates/test.conf"),
        "# base xterm-256color\nprogram=vscode\nlang=en_US.UTF-8\n"
    );
    assert_eq!(project.read("templates/nobase.conf"), "editor=vim\n");
}

#[test]
fn test_custom_template_extensions() {
    let project = TestProject::new();
    project.write("templates/app.conf.tpl", "{{ editor }}");
    project.write("templates/other.conf.j2", "{{ editor }}");

    project
        .envtmpl()
        .args(["--template-extensions", "tpl", "-o", "out", "templates"])
        .assert()
        .success();

    assert_eq!(project.read("out/app.conf"), "vim");
    assert!(!project.exists("out/other.conf"));
}

#[test]
fn test_template_extensions_from_environment() {
    let project = TestProject::new();
    project.write("templates/app.conf.tpl", "{{ editor }}");

    project
        .envtmpl_with(&[("EDITOR", "nano"), ("ENVTMPL_TEMPLATE_EXTENSIONS", "tpl")])
        .args(["-o", "out", "templates"])
        .assert()
        .success();

    assert_eq!(project.read("out/app.conf"), "nano");
}

#[test]
fn test_output_is_a_file() {
    let project = TestProject::new();
    simple_directory(&project, "templates");
    project.write("out", "I am a file");

    project
        .envtmpl()
        .args(["-o", "out", "templates"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("is not a directory"));

    assert_eq!(project.read("out"), "I am a file");
}
