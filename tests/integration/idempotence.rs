//! Running the reducer on an already-minimal artifact must leave it
//! bytewise unchanged and terminate after one main-phase sweep.

use std::fs;

use crate::util::{assert_success, sandbox};

#[test]
fn minimal_artifact_is_left_unchanged() {
    let sb = sandbox();
    let artifact = sb.write_artifact("input.c", b"X");
    let oracle = sb.write_script("oracle.sh", r#"grep -q X "$1""#);

    let output = sb.run(&["--sllooww"], &oracle, &artifact);
    assert_success(&output);

    assert_eq!(fs::read(&artifact).expect("read artifact"), b"X");
    assert_eq!(output.stdout, b"X");
    assert_eq!(
        fs::read(sb.dir.path().join("input.c.orig")).expect("read orig"),
        b"X"
    );
}
