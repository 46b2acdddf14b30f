//! An oracle that accepts anything must let the reducer empty the file.

use std::fs;

use crate::util::{assert_success, sandbox};

#[test]
fn identity_oracle_reduces_to_empty() {
    let sb = sandbox();
    let artifact = sb.write_artifact("input.c", b"int x;\nint y;\nint z;\n");
    let oracle = sb.write_script("oracle.sh", "exit 0");

    let output = sb.run(&[], &oracle, &artifact);
    assert_success(&output);

    assert_eq!(fs::read(&artifact).expect("read artifact"), b"");

    // The pristine input survives in the .orig sibling; the .best
    // sibling holds the final artifact.
    let orig = sb.dir.path().join("input.c.orig");
    let best = sb.dir.path().join("input.c.best");
    assert_eq!(
        fs::read(&orig).expect("read orig"),
        b"int x;\nint y;\nint z;\n"
    );
    assert_eq!(fs::read(&best).expect("read best"), b"");
}

#[test]
fn finalize_prints_the_reduced_artifact_on_stdout() {
    let sb = sandbox();
    let artifact = sb.write_artifact("input.c", b"keep me\n");
    // Only the exact original is interesting, so nothing reduces.
    let oracle = sb.write_script("oracle.sh", r#"grep -q "keep me" "$1""#);

    let output = sb.run(&[], &oracle, &artifact);
    assert_success(&output);
    assert_eq!(output.stdout, b"keep me\n");
}
