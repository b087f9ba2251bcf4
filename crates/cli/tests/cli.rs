use assert_cmd::Command;
use std::io::Write;

fn cli() -> Command {
    Command::cargo_bin("learner-recover").expect("binary should build")
}

#[test]
fn version_prints_crate_version() {
    let output = cli().arg("version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_args_shows_usage_and_exits_nonzero() {
    let output = cli().output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Usage:"));
}

#[test]
fn recover_with_missing_config_file_fails() {
    let output = cli()
        .args(["recover", "-c", "/nonexistent/config.yaml"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn recover_with_malformed_yaml_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "not: [valid, yaml, for, this, schema").unwrap();

    let output = cli()
        .args(["recover", "-c", file.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
