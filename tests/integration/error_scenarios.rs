//! Failures: duplicate keys, template errors and bad paths.

use crate::common::TestProject;
use predicates::prelude::*;

#[test]
fn test_duplicate_key() {
    let project = TestProject::new();
    project.write("app.conf.j2", "{{ one.two }}");

    project
        .envtmpl_with(&[("ONE_TWO", "a"), ("oneTwo", "b")])
        .args(["-o", "app.conf", "app.conf.j2"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("is defined multiple times"))
        .stderr(predicate::str::contains("one.two"));

    assert!(!project.exists("app.conf"));
}

#[test]
fn test_syntax_error_shows_source_window() {
    let project = TestProject::new();
    project.write("error.jinja", "first line\nsecond line\n{{ lang + }}\nfourth line\n");

    project
        .envtmpl()
        .arg("error.jinja")
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("error.jinja"))
        .stderr(predicate::str::contains("2:    second line"))
        .stderr(predicate::str::contains("3: >> {{ lang + }}"))
        .stderr(predicate::str::contains("4:    fourth line"));
}

#[test]
fn test_single_line_syntax_error() {
    let project = TestProject::new();
    project.write("error.jinja", "{% if %}");

    project
        .envtmpl()
        .arg("error.jinja")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("1: >> {% if %}"));
}

#[test]
fn test_undefined_variable_suggests_close_match() {
    let project = TestProject::new();
    project.write("app.conf.j2", "lang={{ lang }}\n{{ editr }}\n");

    project
        .envtmpl()
        .args(["--strict-undefined", "app.conf.j2"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("editr"))
        .stderr(predicate::str::contains("editor"))
        .stderr(predicate::str::contains("2: >> {{ editr }}"));
}

#[test]
fn test_undefined_variable_without_strict_mode_succeeds() {
    let project = TestProject::new();
    project.write("app.conf.j2", "[{{ editr }}]");

    project.envtmpl().arg("app.conf.j2").assert().success().stdout("[]");
}

#[test]
fn test_failed_render_keeps_previous_output() {
    let project = TestProject::new();
    project.write("app.conf.j2", "{{ lang }}\n{{ \"missing.pem\" | readfile }}\n");
    project.write("app.conf", "previous\n");

    project.envtmpl().args(["-o", "app.conf", "app.conf.j2"]).assert().failure().code(1);

    assert_eq!(project.read("app.conf"), "previous\n");
}

#[test]
fn test_render_error_shows_line() {
    let project = TestProject::new();
    project.write("app.conf.j2", "lang={{ lang }}\ncert={{ \"missing.pem\" | readfile }}\n");

    project
        .envtmpl()
        .arg("app.conf.j2")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing.pem"))
        .stderr(predicate::str::contains("2: >> cert="));
}

#[test]
fn test_missing_template() {
    let project = TestProject::new();

    project
        .envtmpl()
        .arg("nope.j2")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Template not found: nope.j2"));
}

#[test]
fn test_missing_template_argument() {
    let project = TestProject::new();

    project.envtmpl().assert().failure().code(2);
}
