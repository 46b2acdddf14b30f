//! Bracket-context reduction: the pair-removal sub-passes peel
//! delimiters while keeping the interesting contents.

use std::fs;

use crate::util::{assert_success, sandbox};

#[test]
fn balanced_oracle_peels_brackets_down_to_payload() {
    let sb = sandbox();
    let artifact = sb.write_artifact("input.c", b"((f))");
    let oracle = sb.write_script(
        "oracle.sh",
        r#"grep -q f "$1" || exit 1
opens=$(tr -cd '(' < "$1" | wc -c)
closes=$(tr -cd ')' < "$1" | wc -c)
[ "$opens" -eq "$closes" ]"#,
    );

    let output = sb.run(&[], &oracle, &artifact);
    assert_success(&output);

    assert_eq!(fs::read(&artifact).expect("read artifact"), b"f");
}
