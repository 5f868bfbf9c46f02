// tenet/tests/cli.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const USER_SCHEMA: &str = r#"{
    "type": "object",
    "required": ["email", "membership"]
}"#;

/// Lays out a project: data documents, a schema, a skip procedure, and a
/// recipe wiring them together. Returns the recipe path.
fn write_project(root: &Path, docs: &[(&str, &str)], schema_output: Option<&Path>) -> String {
    fs::create_dir_all(root.join("data")).expect("create data dir");
    for (name, content) in docs {
        fs::write(root.join("data").join(name), content).expect("write doc");
    }
    fs::write(root.join("schema.json"), USER_SCHEMA).expect("write schema");
    fs::write(root.join("noop.jinja"), "null").expect("write procedure");

    let output_block = match schema_output {
        Some(path) => format!(
            r#"
        output:
          treat_as: error
          targets:
            - name: report
              format: json
              type: dir
              path: "{}"
"#,
            path.display()
        ),
        None => String::new(),
    };

    let recipe = format!(
        r#"resources:
  - name: user-data
    format: json
    type: dir
    path: "{data}"
    framework_names:
      - user-check
frameworks:
  - name: user-check
    schemas:
      - name: user-schema
        type: file
        path: "{schema}"{output_block}
    procedures:
      - name: noop
        type: file
        path: "{procedure}"
"#,
        data = root.join("data").display(),
        schema = root.join("schema.json").display(),
        procedure = root.join("noop.jinja").display(),
    );
    let recipe_path = root.join("tenet.yaml");
    fs::write(&recipe_path, recipe).expect("write recipe");
    recipe_path.to_string_lossy().into_owned()
}

fn tenet() -> Command {
    Command::cargo_bin("tenet").expect("binary built")
}

#[test]
fn test_execute_happy_path_exits_zero() {
    let dir = tempdir().expect("tempdir");
    let recipe = write_project(
        dir.path(),
        &[("x.json", "{\"email\":\"a@b\",\"membership\":\"premium\"}")],
        None,
    );

    tenet()
        .args(["execute", "-R", recipe.as_str(), "-P", "simple"])
        .assert()
        .success();
}

#[test]
fn test_execute_schema_violation_exits_nonzero_with_report() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("out");
    let recipe = write_project(dir.path(), &[("x.json", "{\"email\":\"a@b\"}")], Some(&out));

    tenet()
        .args(["execute", "-R", recipe.as_str(), "-P", "simple"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("x.json"))
        .stderr(predicate::str::contains("business error encountered"));

    // the violation report was written under the dir target
    assert!(out.exists());
}

#[test]
fn test_execute_resource_with_unknown_name_fails() {
    let dir = tempdir().expect("tempdir");
    let recipe = write_project(
        dir.path(),
        &[("x.json", "{\"email\":\"a@b\",\"membership\":\"premium\"}")],
        None,
    );

    tenet()
        .args(["execute", "-R", recipe.as_str(), "resource", "-n", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[ghost]"));
}

#[test]
fn test_execute_resource_restricts_to_named_resource() {
    let dir = tempdir().expect("tempdir");
    let recipe = write_project(
        dir.path(),
        &[("x.json", "{\"email\":\"a@b\",\"membership\":\"premium\"}")],
        None,
    );

    tenet()
        .args([
            "execute",
            "-R",
            recipe.as_str(),
            "-P",
            "simple",
            "resource",
            "-n",
            "user-data",
        ])
        .assert()
        .success();
}

#[test]
fn test_profile_prints_tables() {
    let dir = tempdir().expect("tempdir");
    let recipe = write_project(
        dir.path(),
        &[("x.json", "{\"email\":\"a@b\",\"membership\":\"premium\"}")],
        None,
    );

    tenet()
        .args(["profile", "-R", recipe.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("RESOURCE:"))
        .stdout(predicate::str::contains("FRAMEWORK:"))
        .stdout(predicate::str::contains("user-check"))
        .stdout(predicate::str::contains("user-schema"));
}

#[test]
fn test_missing_recipe_file_fails() {
    tenet()
        .args(["execute", "-R", "/definitely/not/here.yaml"])
        .assert()
        .failure();
}
