//! Byte-level reduction down to a single interesting byte.

use std::fs;

use crate::util::{assert_success, sandbox};

#[test]
fn substring_oracle_reduces_to_one_byte() {
    let sb = sandbox();
    let artifact = sb.write_artifact("input.c", b"AAAXAAA");
    let oracle = sb.write_script("oracle.sh", r#"grep -q X "$1""#);

    // Byte-granularity removal is gated behind --sllooww.
    let output = sb.run(&["--sllooww", "-n", "2"], &oracle, &artifact);
    assert_success(&output);

    assert_eq!(fs::read(&artifact).expect("read artifact"), b"X");
}
