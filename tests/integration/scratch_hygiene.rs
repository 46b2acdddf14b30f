//! Scratch directories must not outlive the run, on success or on a
//! caught signal, unless --save-temps asks for them.

use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::util::{assert_success, sandbox, BIN};

#[test]
fn no_scratch_leak_on_success() {
    let sb = sandbox();
    let artifact = sb.write_artifact("input.c", b"a\nb\nc\n");
    let oracle = sb.write_script("oracle.sh", "exit 0");

    let output = sb.run(&[], &oracle, &artifact);
    assert_success(&output);
    assert!(sb.scratch_leftovers().is_empty());
}

#[test]
fn save_temps_keeps_scratch_dirs() {
    let sb = sandbox();
    let artifact = sb.write_artifact("input.c", b"a\nb\nc\n");
    let oracle = sb.write_script("oracle.sh", "exit 0");

    let output = sb.run(&["--save-temps"], &oracle, &artifact);
    assert_success(&output);
    assert!(!sb.scratch_leftovers().is_empty());
}

#[test]
fn sigterm_tears_down_without_leaking_scratch() {
    let sb = sandbox();
    let artifact = sb.write_artifact("input.c", b"a\nb\nc\n");
    // Slow oracle keeps the run alive long enough to signal it.
    let oracle = sb.write_script("oracle.sh", "sleep 1\nexit 0");

    let mut child = Command::new(BIN)
        .arg(&oracle)
        .arg(&artifact)
        .env("TMPDIR", sb.tmp.path())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn reducer-rs");

    thread::sleep(Duration::from_millis(300));
    unsafe {
        libc::kill(child.id() as i32, libc::SIGTERM);
    }

    // The handler defers teardown to the orchestrator, which is blocked
    // on the current oracle invocation; allow it time to unwind.
    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().expect("try_wait") {
            break status;
        }
        assert!(Instant::now() < deadline, "reducer did not exit after SIGTERM");
        thread::sleep(Duration::from_millis(50));
    };

    assert!(!status.success());
    assert!(sb.scratch_leftovers().is_empty());
}
