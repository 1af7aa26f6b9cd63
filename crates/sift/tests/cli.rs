//! CLI integration tests for sift commands.
//!
//! These tests focus on exit codes and compiled output. Output is piped, so no styling
//! is applied.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to get a sift command.
fn sift() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("sift").unwrap()
}

/// Helper to run `sift` with the global config directory isolated to `home`.
fn sift_with_home(home: &Path) -> Command {
    let mut cmd = sift();
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join(".config"));
    cmd.env_remove("SIFT_LOG");
    cmd
}

/// Creates a project directory containing the `sift init` template.
fn project() -> tempfile::TempDir {
    let dir = temp_dir();
    sift_with_home(dir.path())
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

/// Runs `sift` inside `dir` with an isolated home.
fn sift_in(dir: &Path) -> Command {
    let mut cmd = sift_with_home(dir);
    cmd.current_dir(dir);
    cmd
}

mod parse {
    use super::*;

    #[test]
    fn prints_tree_and_normalized_form() {
        let dir = temp_dir();
        sift_in(dir.path())
            .args(["parse", "a -b*"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Query\n  AndExpression\n    Word(\"a\")\n    Negation\n      PrefixWord(\"b\")\n",
            ))
            .stdout(predicate::str::contains("Normalized:\n  a -b*"));
    }

    #[test]
    fn prints_tokens() {
        let dir = temp_dir();
        sift_in(dir.path())
            .args(["parse", "--tokens", "name:jo"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Tokens:"))
            .stdout(predicate::str::contains("@0 Word(\"name\")"))
            .stdout(predicate::str::contains("@5 Word(\"jo\")"));
    }

    #[test]
    fn invalid_syntax_fails() {
        let dir = temp_dir();
        sift_in(dir.path())
            .args(["parse", "tag:()"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid search syntax"))
            .stderr(predicate::str::contains("Value term in KVTerm can not be empty"));
    }

    #[test]
    fn ignores_broken_config() {
        let dir = temp_dir();
        fs::write(dir.path().join("sift.toml"), "this is not toml [").unwrap();
        sift_in(dir.path()).args(["parse", "a"]).assert().success();
    }
}

mod tsquery {
    use super::*;

    #[test]
    fn compiles_mixed_query() {
        let dir = temp_dir();
        sift_in(dir.path())
            .args(["tsquery", "status:(active|terminated) -tag:test \"core link\""])
            .assert()
            .success()
            .stdout(
                "status <-> (active | terminated) & !(tag <-> test) & core <-> link\n",
            );
    }

    #[test]
    fn empty_query_prints_empty_line() {
        let dir = temp_dir();
        sift_in(dir.path())
            .args(["tsquery", ""])
            .assert()
            .success()
            .stdout("\n")
            .stderr(predicate::str::contains("everything matches"));
    }

    #[test]
    fn negated_empty_group_never_matches() {
        let dir = temp_dir();
        sift_in(dir.path())
            .args(["tsquery", "a -()"])
            .assert()
            .success()
            .stdout("\n")
            .stderr(predicate::str::contains("can never match"));
    }

    #[test]
    fn unbalanced_paren_fails() {
        let dir = temp_dir();
        sift_in(dir.path())
            .args(["tsquery", "(a b"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid search syntax"));
    }
}

mod sql {
    use super::*;

    #[test]
    fn compiles_field_term_with_parameters() {
        let dir = project();
        sift_in(dir.path())
            .args(["sql", "status:active"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "SELECT * FROM records WHERE records.status = $1",
            ))
            .stdout(predicate::str::contains("-- $1 = 'active'"));
    }

    #[test]
    fn inline_values() {
        let dir = project();
        sift_in(dir.path())
            .args(["sql", "--inline", "-status:active"])
            .assert()
            .success()
            .stdout("SELECT * FROM records WHERE records.status <> 'active'\n");
    }

    #[test]
    fn question_placeholders_with_offset() {
        let dir = project();
        sift_in(dir.path())
            .args(["sql", "-p", "question", "--offset", "2", "status:(a|b)"])
            .assert()
            .success()
            .stdout(predicate::str::contains("records.status IN (?, ?)"))
            .stdout(predicate::str::contains("-- ?3 = 'a'"))
            .stdout(predicate::str::contains("-- ?4 = 'b'"));
    }

    #[test]
    fn json_output() {
        let dir = project();
        let output = sift_in(dir.path())
            .args(["sql", "--json", "active:yes id:7"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["entity"], "records");
        assert_eq!(json["query"], "active:yes id:7");
        assert_eq!(
            json["sql"],
            "SELECT * FROM records WHERE records.is_active = $1 AND records.id = $2"
        );
        assert_eq!(json["params"], serde_json::json!([true, 7]));
    }

    #[test]
    fn alias_resolves_to_field() {
        let dir = project();
        sift_in(dir.path())
            .args(["sql", "--inline", "n:jo*"])
            .assert()
            .success()
            .stdout(predicate::str::contains("records.display_name LIKE 'jo%'"));
    }

    #[test]
    fn unknown_field_matches_nothing() {
        let dir = project();
        sift_in(dir.path())
            .args(["sql", "--inline", "colour:red"])
            .assert()
            .success()
            .stdout("SELECT * FROM records WHERE FALSE\n");
    }

    #[test]
    fn inline_conflicts_with_json() {
        let dir = project();
        sift_in(dir.path())
            .args(["sql", "--inline", "--json", "a"])
            .assert()
            .failure();
    }

    #[test]
    fn without_config_suggests_init() {
        let dir = temp_dir();
        sift_in(dir.path())
            .args(["sql", "a"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("sift init"));
    }

    #[test]
    fn unknown_entity_fails() {
        let dir = project();
        sift_in(dir.path())
            .args(["sql", "-e", "people", "a"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("people"));
    }

    #[test]
    fn explicit_config_file() {
        let dir = temp_dir();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            "[entity.people]\ntable = \"people\"\n\n[entity.people.fields]\nrole = \"text\"\n",
        )
        .unwrap();

        sift_in(dir.path())
            .args(["sql", "--inline", "--config"])
            .arg(&path)
            .arg("role:admin")
            .assert()
            .success()
            .stdout("SELECT * FROM people WHERE people.role = 'admin'\n");
    }

    #[test]
    fn syntax_error_fails() {
        let dir = project();
        sift_in(dir.path())
            .args(["sql", "a |"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid search syntax"));
    }
}

mod fields {
    use super::*;

    #[test]
    fn lists_template_fields() {
        let dir = project();
        sift_in(dir.path())
            .arg("fields")
            .assert()
            .success()
            .stdout(predicate::str::contains("records"))
            .stdout(predicate::str::contains("display_name"))
            .stdout(predicate::str::contains("boolean"));
    }

    #[test]
    fn no_entities() {
        let dir = temp_dir();
        sift_in(dir.path())
            .arg("fields")
            .assert()
            .success()
            .stdout(predicate::str::contains("No entities defined."));
    }
}

mod check {
    use super::*;

    #[test]
    fn no_config_files() {
        let dir = temp_dir();
        sift_in(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No configuration files found."));
    }

    #[test]
    fn template_has_no_issues() {
        let dir = project();
        sift_in(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No issues found."))
            .stdout(predicate::str::contains("placeholder = \"dollar\""));
    }

    #[test]
    fn missing_default_entity_warns() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("sift.toml"),
            "[settings]\ndefault_entity = \"people\"\n\n[entity.records.fields]\nid = \"identifier\"\n",
        )
        .unwrap();

        sift_in(dir.path())
            .arg("check")
            .assert()
            .failure()
            .stdout(predicate::str::contains("default entity 'people' is not defined"));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("sift.toml"),
            "[entity.records.fields]\nid = \"uuid\"\n",
        )
        .unwrap();

        sift_in(dir.path())
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let dir = project();
        let contents = fs::read_to_string(dir.path().join("sift.toml")).unwrap();
        assert!(contents.contains("[entity.records]"));
    }

    #[test]
    fn fails_if_config_exists() {
        let dir = temp_dir();
        fs::write(dir.path().join("sift.toml"), "existing").unwrap();

        sift_in(dir.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn force_overwrites() {
        let dir = temp_dir();
        fs::write(dir.path().join("sift.toml"), "existing").unwrap();

        sift_in(dir.path())
            .args(["init", "--force"])
            .assert()
            .success();

        let contents = fs::read_to_string(dir.path().join("sift.toml")).unwrap();
        assert!(contents.contains("[entity.records]"));
    }

    #[test]
    fn global_creates_commented_template() {
        let dir = temp_dir();
        sift_in(dir.path())
            .args(["init", "--global"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"));

        let path = dir.path().join(".config").join("sift").join("sift.toml");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("# placeholder = \"dollar\""));
    }
}
