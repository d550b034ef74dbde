use std::path::PathBuf;
use std::process::{Command, Output};

const NO_CONFIG: &str = "no-such-lifegrid.toml";

fn lifegrid(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lifegrid"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to launch lifegrid")
}

fn exit_code(args: &[&str]) -> Option<i32> {
    lifegrid(args).status.code()
}

fn config_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("lifegrid-{}-{name}.toml", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn successful_run_exits_zero() {
    let output = lifegrid(&["--config", NO_CONFIG, "serial", "8", "1"]);
    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Alive cells:"), "stderr was: {stderr}");
}

#[test]
fn help_exits_zero() {
    assert_eq!(exit_code(&["--help"]), Some(0));
}

#[test]
fn usage_errors_exit_one() {
    assert_eq!(exit_code(&["--config", NO_CONFIG, "serial", "0", "10"]), Some(1));
    assert_eq!(exit_code(&["serial", "10"]), Some(1));
    assert_eq!(exit_code(&[]), Some(1));
}

#[test]
fn invalid_configuration_exits_one() {
    let output = lifegrid(&["--config", NO_CONFIG, "distributed", "3", "1", "--workers", "4"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid configuration"), "stderr was: {stderr}");
}

#[test]
fn aborted_run_exits_one() {
    let config = config_file("abort", "[cluster]\nmax_grid_cells = 60\n");
    let path = config.to_string_lossy().into_owned();
    let output = lifegrid(&["--config", &path, "distributed", "10", "5", "--workers", "3"]);
    std::fs::remove_file(&config).ok();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Run aborted by worker 0"), "stderr was: {stderr}");
}
