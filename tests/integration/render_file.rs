//! Rendering single template files.

use crate::common::TestProject;
use predicates::prelude::*;

#[test]
fn test_render_to_stdout() {
    let project = TestProject::new();
    project.write("simple.jinja", "{{ lang }} {{ editor }} {{ term._ }}/{{ term.program }}\n");

    project
        .envtmpl()
        .arg("simple.jinja")
        .assert()
        .success()
        .stdout("en_US.UTF-8 vim xterm-256color/vscode\n");
}

#[test]
fn test_render_to_output_file() {
    let project = TestProject::new();
    project.write("app.conf.j2", "url={{ database.one.url }}\nport={{ http.port }}\n");

    project.envtmpl().args(["-o", "app.conf", "app.conf.j2"]).assert().success().stdout("");

    assert_eq!(project.read("app.conf"), "url=postgres://db.internal/app\nport=8080\n");
    assert_eq!(project.read("app.conf.j2"), "url={{ database.one.url }}\nport={{ http.port }}\n");
}

#[test]
fn test_output_parent_directories_are_created() {
    let project = TestProject::new();
    project.write("app.conf.j2", "{{ lang }}");

    project.envtmpl().args(["-o", "etc/app/app.conf", "app.conf.j2"]).assert().success();

    assert_eq!(project.read("etc/app/app.conf"), "en_US.UTF-8");
}

#[test]
fn test_camel_case_and_filters() {
    let project = TestProject::new();
    project.write(
        "filters.jinja",
        "{{ camel.case.variable }}\n\
         {{ camel.case.variable | b64encode }}\n\
         {{ \"aGFuZGxldGhpc3Rvbw==\" | b64decode }}\n\
         {% if feature.enabled | boolean %}on{% else %}off{% endif %}\n",
    );

    project
        .envtmpl_with(&[("camelCaseVariable", "handlethistoo"), ("FEATURE_ENABLED", "yes")])
        .arg("filters.jinja")
        .assert()
        .success()
        .stdout("handlethistoo\naGFuZGxldGhpc3Rvbw==\nhandlethistoo\non");
}

#[test]
fn test_readfile_filter() {
    let project = TestProject::new();
    let cert = project.write("tls/cert.pem", "-----BEGIN CERTIFICATE-----\n");
    project.write("server.conf.j2", "{{ tls.cert.path | readfile }}");

    project
        .envtmpl_with(&[("TLS_CERT_PATH", cert.to_str().unwrap())])
        .arg("server.conf.j2")
        .assert()
        .success()
        .stdout("-----BEGIN CERTIFICATE-----\n");
}

#[test]
fn test_undefined_variables_render_empty() {
    let project = TestProject::new();
    project.write(
        "undefined.j2",
        "lang={{ lang }} x={{ missing }} y={{ term.foo.bar }}\n\
         [{{ term.foo.bar | default(\"none\") }}]\n\
         {% if term.foo is defined %}defined{% else %}term -> foo is not defined{% endif %}\n",
    );

    project
        .envtmpl()
        .arg("undefined.j2")
        .assert()
        .success()
        .stdout("lang=en_US.UTF-8 x= y=\n[none]\nterm -> foo is not defined");
}

#[test]
fn test_filters_on_undefined_variable() {
    let project = TestProject::new();
    project.write(
        "base64.j2",
        "ENCODED={{ camel.case.variable | b64encode }}\n\
         UNDEFINED_VARIABLE={{ undefined.variable | b64encode }}\n",
    );

    project
        .envtmpl()
        .arg("base64.j2")
        .assert()
        .success()
        .stdout("ENCODED=aGFuZGxldGhpc3Rvbw==\nUNDEFINED_VARIABLE=\n");
}

#[test]
fn test_block_tags_leave_no_blank_lines() {
    let project = TestProject::new();
    project.write(
        "nginx.conf.j2",
        "server {\n    {% if http.port %}\n    listen {{ http.port }};\n    {% endif %}\n}\n",
    );

    project.envtmpl().arg("nginx.conf.j2").assert().success().stdout("server {\n    listen 8080;\n}\n");
}

#[test]
fn test_include_from_base_directory() {
    let project = TestProject::new();
    project.write("base/partials/header.j2", "# managed for {{ editor }}\n");
    project.write("main.conf.j2", "{% include \"partials/header.j2\" %}lang={{ lang }}\n");

    project
        .envtmpl()
        .args(["-b", "base", "main.conf.j2"])
        .assert()
        .success()
        .stdout("# managed for vim\nlang=en_US.UTF-8\n");
}

#[test]
fn test_template_file_with_any_extension_renders() {
    let project = TestProject::new();
    project.write("plain.txt", "{{ editor }}");

    project.envtmpl().arg("plain.txt").assert().success().stdout("vim");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let project = TestProject::new();
    project.write("app.conf.j2", "{{ lang }}");

    project
        .envtmpl()
        .args(["--verbose", "-o", "app.conf", "app.conf.j2"])
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Rendering app.conf.j2 to app.conf"));
}

#[test]
fn test_quiet_prints_nothing_on_success() {
    let project = TestProject::new();
    project.write("app.conf.j2", "{{ lang }}");

    project.envtmpl().args(["-q", "-o", "app.conf", "app.conf.j2"]).assert().success().stderr("");
}
