//! The one-time preprocessing step: runs exactly once, on the first
//! main-phase sweep, and its failure is fatal.

use std::fs;

use crate::util::{assert_success, sandbox};

#[test]
fn preprocessor_runs_exactly_once() {
    let sb = sandbox();
    let artifact = sb.write_artifact("input.c", b"KEEP\nJUNK1\nJUNK2\n");
    let oracle = sb.write_script("oracle.sh", r#"grep -q KEEP "$1""#);
    let marker = sb.dir.path().join("cpp.ran");
    let cpp = sb.write_script(
        "cpp.sh",
        &format!("echo ran >> {}\nexit 0", marker.display()),
    );

    let output = sb.run(
        &["--cpp", cpp.to_str().expect("utf8 path")],
        &oracle,
        &artifact,
    );
    assert_success(&output);

    assert_eq!(fs::read(&marker).expect("read marker"), b"ran\n");
    assert_eq!(fs::read(&artifact).expect("read artifact"), b"KEEP\n");
}

#[test]
fn failing_preprocessor_is_fatal() {
    let sb = sandbox();
    let artifact = sb.write_artifact("input.c", b"KEEP\n");
    let oracle = sb.write_script("oracle.sh", r#"grep -q KEEP "$1""#);
    let cpp = sb.write_script("cpp.sh", "exit 3");

    let output = sb.run(
        &["--cpp", cpp.to_str().expect("utf8 path")],
        &oracle,
        &artifact,
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("preprocessor failed"), "stderr: {stderr}");
}
