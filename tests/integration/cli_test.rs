use assert_cmd::Command;
use predicates::prelude::*;

use super::bundle::Bundle;

fn trim_ps2() -> Command {
    let mut cmd = Command::cargo_bin("trim-ps2").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_no_module_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    trim_ps2()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_help_and_version() {
    trim_ps2()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dump"))
        .stdout(predicate::str::contains("EXIT CODES"));

    trim_ps2()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_option_exits_with_usage_code() {
    trim_ps2().args(["--frobnicate", "myapp"]).assert().code(1);
}

#[test]
fn test_quiet_and_verbose_conflict() {
    trim_ps2().args(["-q", "-v", "myapp"]).assert().code(1);
}

#[test]
fn test_missing_binding_package_exits_3() {
    let bundle = Bundle::without_binding();

    trim_ps2()
        .current_dir(bundle.root())
        .env("HOME", bundle.root())
        .arg("--python")
        .arg(bundle.python())
        .args(["--no-progress", "--no-colors", "myapp"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ERROR: PySide2 not found"));
}

#[test]
fn test_init_writes_default_config() {
    let dir = tempfile::tempdir().unwrap();

    trim_ps2()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .arg("--init")
        .assert()
        .success();

    let written = std::fs::read_to_string(dir.path().join(".trim-ps2.toml")).unwrap();
    assert!(written.contains("binding_package"));

    // a second run leaves the existing file alone
    std::fs::write(dir.path().join(".trim-ps2.toml"), "quiet = true\n").unwrap();
    trim_ps2()
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .arg("--init")
        .assert()
        .success();
    assert_eq!(
        std::fs::read_to_string(dir.path().join(".trim-ps2.toml")).unwrap(),
        "quiet = true\n"
    );
}

#[cfg(unix)]
#[test]
fn test_crashing_target_exits_2() {
    let bundle = Bundle::new();
    bundle.fake_python(
        "echo 'Traceback (most recent call last):' >&2\n\
         echo 'RuntimeError: no display' >&2\n\
         exit 1",
    );

    trim_ps2()
        .current_dir(bundle.root())
        .env("HOME", bundle.root())
        .arg("--python")
        .arg(bundle.python())
        .args(["--no-progress", "--no-colors", "myapp"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("RuntimeError: no display"))
        .stdout(predicate::str::contains(
            "ERROR: 'myapp' module exited with code 1. Abort deps gathering.",
        ));

    assert!(bundle.binding("QtWebEngineWidgets.abi3.so").exists());
}

#[cfg(unix)]
#[test]
fn test_end_to_end_prune() {
    let bundle = Bundle::new();
    bundle.fake_python(&format!(
        "echo \"{}\" >&2\nexit 0",
        bundle.loaded("QtCore.abi3.so").trim_end()
    ));

    trim_ps2()
        .current_dir(bundle.root())
        .env("HOME", bundle.root())
        .arg("--python")
        .arg(bundle.python())
        .args(["--no-progress", "--no-colors", "myapp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("***** APP DEPS *****\n\n{QtCore.abi3.so}"))
        .stdout(predicate::str::contains("Clearing unused dependencies..."))
        .stdout(predicate::str::contains("PySide2 directory size after: 4B"));

    assert!(bundle.binding("QtCore.abi3.so").exists());
    assert!(!bundle.binding("QtWidgets.abi3.so").exists());
    assert!(!bundle.binding("designer").exists());
}

#[cfg(unix)]
#[test]
fn test_json_dump_owns_stdout() {
    let bundle = Bundle::new();
    bundle.fake_python(&format!(
        "echo \"{}\" >&2\nexit 0",
        bundle.loaded("QtGui.abi3.so").trim_end()
    ));

    let output = trim_ps2()
        .current_dir(bundle.root())
        .env("HOME", bundle.root())
        .arg("--python")
        .arg(bundle.python())
        .args(["--dump", "-o", "json", "--no-progress", "myapp"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["module"], "myapp");
    assert!(bundle.binding("QtWidgets.abi3.so").exists());
}

#[test]
fn test_missing_interpreter_exits_2() {
    let bundle = Bundle::new();

    trim_ps2()
        .current_dir(bundle.root())
        .env("HOME", bundle.root())
        .arg("--python")
        .arg(bundle.python())
        .args(["--no-progress", "--no-colors", "myapp"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'myapp' module could not be started"));

    assert!(bundle.binding("QtWebEngineWidgets.abi3.so").exists());
}
