//! End-to-end tests for the rejig binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write_script(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn rejig() -> Command {
    Command::cargo_bin("rejig").unwrap()
}

#[test]
fn actions_reports_inline_variable_as_json() {
    let dir = TempDir::new().unwrap();
    let source = "const v = a + b;\nconst y = v * 2;\n";
    let file = write_script(&dir, "app.js", source);
    let at = source.find("v *").unwrap() as u32;

    rejig()
        .arg("actions")
        .arg(&file)
        .arg("--at")
        .arg(at.to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains("inline-variable"))
        .stdout(predicate::str::contains("inline-here"));
}

#[test]
fn apply_prints_new_text_by_default() {
    let dir = TempDir::new().unwrap();
    let source = "const v = a + b;\nconst y = v * 2;\n";
    let file = write_script(&dir, "app.js", source);
    let at = source.find('v').unwrap() as u32;

    rejig()
        .arg("apply")
        .arg(&file)
        .arg("--at")
        .arg(at.to_string())
        .arg("inline-variable")
        .arg("inline-all")
        .assert()
        .success()
        .stdout(predicate::eq("const y = (a + b) * 2;\n"));

    // Without --write the file is untouched.
    assert_eq!(fs::read_to_string(&file).unwrap(), source);
}

#[test]
fn apply_write_rewrites_the_file() {
    let dir = TempDir::new().unwrap();
    let source = "const s = \"Mr \" + name + \" is \" + age;\n";
    let file = write_script(&dir, "app.js", source);
    let at = source.find("Mr").unwrap() as u32;

    rejig()
        .arg("apply")
        .arg(&file)
        .arg("--at")
        .arg(at.to_string())
        .arg("convert-string")
        .arg("to-template")
        .arg("--write")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "const s = `Mr ${name} is ${age}`;\n"
    );
}

#[test]
fn apply_diff_shows_changed_lines() {
    let dir = TempDir::new().unwrap();
    let source = "const v = 1;\nuse(v);\n";
    let file = write_script(&dir, "app.js", source);
    let at = source.find('v').unwrap() as u32;

    rejig()
        .arg("apply")
        .arg(&file)
        .arg("--at")
        .arg(at.to_string())
        .arg("inline-variable")
        .arg("inline-all")
        .arg("--diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("-const v = 1;"))
        .stdout(predicate::str::contains("+use(1);"));
}

#[test]
fn unknown_refactor_fails() {
    let dir = TempDir::new().unwrap();
    let source = "const v = 1;\nuse(v);\n";
    let file = write_script(&dir, "app.js", source);

    rejig()
        .arg("apply")
        .arg(&file)
        .arg("--at")
        .arg("6")
        .arg("extract-method")
        .arg("anything")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown refactor"));
}

#[test]
fn unadvertised_action_fails() {
    let dir = TempDir::new().unwrap();
    let source = "const v = 1;\nuse(v);\n";
    let file = write_script(&dir, "app.js", source);
    let at = source.find('v').unwrap() as u32;

    rejig()
        .arg("apply")
        .arg(&file)
        .arg("--at")
        .arg(at.to_string())
        .arg("inline-variable")
        .arg("inline-here")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid action"));
}

#[test]
fn fix_corrects_a_misspelled_identifier() {
    let dir = TempDir::new().unwrap();
    let source = "const spelling = 1;\nuse(speling);\n";
    let file = write_script(&dir, "app.js", source);
    let at = source.find("speling").unwrap() as u32;

    rejig()
        .arg("fix")
        .arg(&file)
        .arg("--at")
        .arg(at.to_string())
        .arg("--write")
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "const spelling = 1;\nuse(spelling);\n"
    );
}

#[test]
fn offset_past_end_fails() {
    let dir = TempDir::new().unwrap();
    let file = write_script(&dir, "app.js", "const v = 1;\n");

    rejig()
        .arg("actions")
        .arg(&file)
        .arg("--at")
        .arg("9999")
        .assert()
        .failure()
        .stderr(predicate::str::contains("past the end"));
}
