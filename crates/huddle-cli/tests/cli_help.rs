use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("huddle")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_register_help_shows_flags() {
    cargo_bin_cmd!("huddle")
        .args(["register", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--fullname"))
        .stdout(predicate::str::contains("--confirm-password"));
}

#[test]
fn test_login_requires_email() {
    cargo_bin_cmd!("huddle")
        .args(["login", "--password", "secret"])
        .env_remove("HUDDLE_PASSWORD")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--email"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("huddle")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
