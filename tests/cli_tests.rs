use assert_cmd::Command;
use predicates::prelude::*;

fn gitlabctl() -> Command {
    let mut cmd = Command::cargo_bin("gitlabctl").unwrap();
    cmd.env_remove("GITLAB_PRIVATE_TOKEN")
        .env_remove("GITLAB_TOKEN")
        .env("GITLAB_HTTP_URL", "http://127.0.0.1:9");
    cmd
}

#[test]
fn test_invalid_enum_value_exits_with_allowed_list() {
    gitlabctl()
        .args(["get", "projects", "--order-by=bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "'bogus' is not a recognized value of 'order-by' flag",
        ))
        .stderr(predicate::str::contains(
            "[id, name, path, created_at, updated_at, last_activity_at]",
        ));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_environment_does_not_crash() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    gitlabctl()
        .env("SOME_UNRELATED_VAR", OsString::from_vec(vec![0xff, 0xfe]))
        .args(["get", "projects", "--order-by=bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "'bogus' is not a recognized value of 'order-by' flag",
        ))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_missing_required_flag_is_reported() {
    gitlabctl()
        .args(["new", "release", "v1.0", "--project=groupx/myapp"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("required flag \"description\" not set"));
}

#[test]
fn test_missing_token_is_reported_before_any_request() {
    gitlabctl()
        .args(["get", "groups"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GITLAB_PRIVATE_TOKEN"));
}

#[test]
fn test_help_lists_command_groups() {
    gitlabctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("edit"));
}

#[test]
fn test_leaf_help_shows_defaults() {
    gitlabctl()
        .args(["get", "projects", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--from-group"))
        .stdout(predicate::str::contains("[default: created_at]"));
}

#[test]
fn test_unknown_flag_is_a_usage_error() {
    let output = gitlabctl()
        .args(["get", "groups", "--no-such-flag"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "unexpected argument '--no-such-flag' found",
        ))
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.lines().count(), 1, "stderr: {stderr}");
}

#[test]
fn test_group_without_subcommand_shows_help() {
    gitlabctl()
        .arg("get")
        .assert()
        .success()
        .stdout(predicate::str::contains("projects"))
        .stderr(predicate::str::is_empty());
}
