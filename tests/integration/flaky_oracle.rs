//! An oracle that rejects the original input means there is nothing to
//! reduce; the driver must fail fast and leave the input alone.

use std::fs;
use std::process::Command;

use crate::util::{sandbox, BIN};

#[test]
fn rejecting_oracle_fails_startup_sanity_check() {
    let sb = sandbox();
    let original = b"int main() { return 0; }\n";
    let artifact = sb.write_artifact("input.c", original);
    let oracle = sb.write_script("oracle.sh", "exit 1");

    let output = sb.run(&[], &oracle, &artifact);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("rejects the original input"),
        "stderr: {stderr}"
    );

    assert_eq!(fs::read(&artifact).expect("read artifact"), original);
    assert!(sb.scratch_leftovers().is_empty());
}

#[test]
fn missing_positionals_exit_with_usage_error() {
    let output = Command::new(BIN).output().expect("run reducer-rs");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage:"), "stderr: {stderr}");
}

#[test]
fn unknown_flag_exits_with_usage_error() {
    let output = Command::new(BIN)
        .arg("--frobnicate")
        .output()
        .expect("run reducer-rs");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn crashing_oracle_counts_as_rejection() {
    let sb = sandbox();
    let artifact = sb.write_artifact("input.c", b"a\nb\n");
    // Accept the original (so the sanity check passes), crash on every
    // smaller candidate. No candidate can be accepted, so the input must
    // come out unchanged: crashes are rejections, not fatal errors.
    let oracle = sb.write_script(
        "oracle.sh",
        r#"[ "$(wc -c < "$1")" -eq 4 ] && exit 0
kill -11 $$"#,
    );

    let output = sb.run(&[], &oracle, &artifact);
    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(fs::read(&artifact).expect("read artifact"), b"a\nb\n");
}
