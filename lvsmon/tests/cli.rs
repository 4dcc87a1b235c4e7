use std::io::Write;
use std::process::{Command, Output};

const POOL: &str = r#"
global_defs {
    lvs_id LVS_TEST
}

virtual_server 10.0.0.1 80 {
    delay_loop 6
    lb_algo rr
    protocol TCP

    real_server 10.0.0.2 80 {
        weight 10
        TCP_CHECK {
            connect_timeout 3
        }
    }
}
"#;

fn lvsmon(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lvsmon"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run lvsmon")
}

fn write_config(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("keepalived-")
        .suffix(".conf")
        .tempfile()
        .unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

#[test]
fn test_check_valid_config() {
    let config = write_config(POOL);
    let output = lvsmon(&["check", config.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 virtual servers, 1 real servers, 1 health checks, 0 diagnostics"));
}

#[test]
fn test_check_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("keepalived.conf");
    let output = lvsmon(&["check", missing.to_str().unwrap()]);

    assert!(!output.status.success());
}

#[test]
fn test_check_unbalanced_braces_fails() {
    let config = write_config("virtual_server 10.0.0.1 80 {\n delay_loop 6\n");
    let output = lvsmon(&["check", config.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unclosed virtual_server block"));
}

#[test]
fn test_check_strict_fails_on_diagnostics() {
    let config = write_config("virtual_server 10.0.0.1 80 { delay_loop soon }");
    let path = config.path().to_str().unwrap();

    assert!(lvsmon(&["check", path]).status.success());
    assert!(!lvsmon(&["check", "--strict", path]).status.success());
}

#[test]
fn test_dump_prints_topology() {
    let config = write_config(POOL);
    let output = lvsmon(&["dump", config.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(" LVS ID = LVS_TEST"));
    assert!(stdout.contains(" VS IP = 10.0.0.1, PORT = 80"));
    assert!(stdout.contains("-> SVR IP = 10.0.0.2, PORT = 80, WEIGHT = 10"));
    assert!(stdout.contains("-> Keepalive method = TCP_CHECK"));
}

#[test]
fn test_export_json_reloads() {
    let config = write_config(POOL);
    let output = lvsmon(&["export", config.path().to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success());

    let mut exported = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    exported.write_all(&output.stdout).unwrap();

    let original = lvsmon(&["dump", config.path().to_str().unwrap()]);
    let reloaded = lvsmon(&["dump", exported.path().to_str().unwrap()]);
    assert!(reloaded.status.success());
    assert_eq!(original.stdout, reloaded.stdout);
}

#[test]
fn test_version() {
    let output = lvsmon(&["version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("lvsmon v"));
}
