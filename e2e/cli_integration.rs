// e2e/cli_integration.rs: the `lzfse` binary as a black-box CLI tool.
//
// Covers multi-file decoding to files, ordered stdout output, list mode and
// the process exit code.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Locate the `lzfse` binary produced by Cargo.
fn lzfse_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_lzfse") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("lzfse");
    p
}

/// Single stored-block stream holding `data`.
fn stored_stream(data: &[u8]) -> Vec<u8> {
    let mut out = b"bvx-".to_vec();
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    out.extend_from_slice(b"bvx$");
    out
}

fn write_input(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

// ── 1. Several inputs decode to files ────────────────────────────────────────

#[test]
fn test_cli_decodes_several_files() {
    let dir = TempDir::new().unwrap();
    let a = write_input(dir.path(), "a.lzfse", &stored_stream(b"first file\n"));
    let b = write_input(dir.path(), "b.lzfse", &stored_stream(b"second file\n"));

    let status = Command::new(lzfse_bin())
        .args(["-q", a.to_str().unwrap(), b.to_str().unwrap()])
        .status()
        .expect("failed to run lzfse");
    assert!(status.success(), "decode should exit 0");
    assert_eq!(fs::read(dir.path().join("a")).unwrap(), b"first file\n");
    assert_eq!(fs::read(dir.path().join("b")).unwrap(), b"second file\n");
}

// ── 2. One bad input fails the run ───────────────────────────────────────────

#[test]
fn test_cli_failing_input_exits_1() {
    let dir = TempDir::new().unwrap();
    let good = write_input(dir.path(), "good.lzfse", &stored_stream(b"ok"));
    let bad = write_input(dir.path(), "bad.lzfse", b"this is not a stream");

    let status = Command::new(lzfse_bin())
        .args(["-q", good.to_str().unwrap(), bad.to_str().unwrap()])
        .status()
        .expect("failed to run lzfse");
    assert_eq!(status.code(), Some(1));
    assert_eq!(fs::read(dir.path().join("good")).unwrap(), b"ok");
    assert!(!dir.path().join("bad").exists());
}

// ── 3. --stdout keeps input order ────────────────────────────────────────────

#[test]
fn test_cli_stdout_in_input_order() {
    let dir = TempDir::new().unwrap();
    let a = write_input(dir.path(), "a.lzfse", &stored_stream(b"AAAA"));
    let b = write_input(dir.path(), "b.lzfse", &stored_stream(b"BBBB"));

    let output = Command::new(lzfse_bin())
        .args(["-q", "-c", a.to_str().unwrap(), b.to_str().unwrap()])
        .output()
        .expect("failed to run lzfse");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"AAAABBBB");
}

// ── 4. --list ────────────────────────────────────────────────────────────────

#[test]
fn test_cli_list_prints_decoded_size() {
    let dir = TempDir::new().unwrap();
    let a = write_input(dir.path(), "a.lzfse", &stored_stream(b"12345"));

    let output = Command::new(lzfse_bin())
        .args(["-l", a.to_str().unwrap()])
        .output()
        .expect("failed to run lzfse");
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("decoded size: 5 bytes"), "{text}");
}

// ── 5. Bad usage ─────────────────────────────────────────────────────────────

#[test]
fn test_cli_output_with_two_inputs_is_rejected() {
    let dir = TempDir::new().unwrap();
    let a = write_input(dir.path(), "a.lzfse", &stored_stream(b"x"));
    let b = write_input(dir.path(), "b.lzfse", &stored_stream(b"y"));

    let status = Command::new(lzfse_bin())
        .args(["-o", "out", a.to_str().unwrap(), b.to_str().unwrap()])
        .current_dir(dir.path())
        .status()
        .expect("failed to run lzfse");
    assert!(!status.success());
    assert!(!dir.path().join("out").exists());
}
