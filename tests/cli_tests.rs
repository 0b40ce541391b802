use std::io::Write;
use std::process::{Command, Output};

fn tinyrouter(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tinyrouter"));
    cmd.args(args);
    for var in [
        "TINYROUTER_CONFIG",
        "TINYROUTER_CASE_SENSITIVE",
        "TINYROUTER_PATH_SEPARATOR",
        "TINYROUTER_WILDCARD",
        "TINYROUTER_GREEDY_WILDCARD",
        "TINYROUTER_UNCONSTRAINED_VAR",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

#[test]
fn test_cli_match_prints_vars() {
    let output = tinyrouter(&["match", "/users/:id", "/users/42", "/teams/1"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "/users/42\t9\t{\"id\":\"42\"}\n/teams/1\tno match\n"
    );
}

#[test]
fn test_cli_compile_reads_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[matcher]\ncase_sensitive = true\n\n[logging]\nlog_level = \"error\"").unwrap();

    let output = tinyrouter(&["compile", "/:id"])
        .arg("--config")
        .arg(file.path())
        .output()
        .expect("run cli");
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "regex: ^(?:/([^/?#]*))\ncase_sensitive: true\nslot 1: id\n"
    );
}

#[test]
fn test_cli_env_overrides_matcher() {
    let output = tinyrouter(&["compile", "/:id"])
        .env("TINYROUTER_UNCONSTRAINED_VAR", r"\d+")
        .output()
        .expect("run cli");
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "regex: ^(?:/(\\d+))\ncase_sensitive: false\nslot 1: id\n"
    );
}

#[test]
fn test_cli_rejects_capturing_option() {
    let output = tinyrouter(&["compile", "/*"])
        .env("TINYROUTER_WILDCARD", "(a)")
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_cli_parse_error_fails() {
    let output = tinyrouter(&["parse", "{foo"]).output().expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unterminated alternation at 4"), "stderr: {stderr}");
}

#[test]
fn test_cli_build_path() {
    let output = tinyrouter(&["build", "/users/:id/:tab", "-p", "id=42", "-p", "tab=posts"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "/users/42/posts\n");
}
