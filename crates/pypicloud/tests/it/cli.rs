//! Integration tests for the `pypicloud-util` command line.

use assert_cmd::Command;

fn pypicloud_util() -> Command {
    let mut command = Command::cargo_bin("pypicloud-util").unwrap();
    command.env_remove("RUST_LOG");
    command
}

#[test]
fn normalize() {
    pypicloud_util()
        .args(["normalize", "Foo_Bar.Baz", "repoze.lru"])
        .assert()
        .success()
        .stdout("foo-bar-baz\nrepoze-lru\n");
}

#[test]
fn parse() {
    pypicloud_util()
        .args(["parse", "Foo_Bar-1.0-py2-none-any.whl"])
        .assert()
        .success()
        .stdout("foo-bar 1.0\n");

    pypicloud_util()
        .args(["parse", "mypkg-1.1-py2.py3-none-any.whl", "--name", "mypkg"])
        .assert()
        .success()
        .stdout("mypkg 1.1\n");
}

#[test]
fn parse_invalid() {
    let assert = pypicloud_util()
        .args(["parse", "not-a-package-file.txt"])
        .assert()
        .code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("Cannot parse package file 'not-a-package-file.txt'"));
}

#[test]
fn dt2ts() {
    pypicloud_util()
        .args(["dt2ts", "2017-07-14T02:40:00.5Z"])
        .assert()
        .success()
        .stdout("1500000000.5\n");

    pypicloud_util()
        .args(["dt2ts", "1970-01-01T01:00:00+01:00[+01:00]"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn ts2dt_invalid() {
    pypicloud_util()
        .args(["ts2dt", "1e20"])
        .assert()
        .code(2);
}

#[test]
fn invalid_retries_setting() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("settings.toml");
    fs_err::write(&config, "[pypi]\nretries = 0\n").unwrap();

    let assert = pypicloud_util()
        .arg("locate")
        .arg("requests")
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("Invalid `pypi.retries` setting: `0`"));
}
