//! Shared sandbox helpers for the end-to-end tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub const BIN: &str = env!("CARGO_BIN_EXE_reducer-rs");

/// Per-test sandbox: artifact + oracle live in `dir`, and the binary
/// runs with TMPDIR pointed at `tmp` so scratch hygiene is observable.
pub struct Sandbox {
    pub dir: tempfile::TempDir,
    pub tmp: tempfile::TempDir,
}

pub fn sandbox() -> Sandbox {
    Sandbox {
        dir: tempfile::tempdir().expect("create sandbox dir"),
        tmp: tempfile::tempdir().expect("create scratch root"),
    }
}

impl Sandbox {
    pub fn write_artifact(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, bytes).expect("write artifact");
        path
    }

    /// Writes an executable `/bin/sh` script. `$1` is the candidate file
    /// name; the working directory is the candidate's scratch dir.
    pub fn write_script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod");
        path
    }

    pub fn run(&self, args: &[&str], oracle: &Path, artifact: &Path) -> Output {
        Command::new(BIN)
            .args(args)
            .arg(oracle)
            .arg(artifact)
            .env("TMPDIR", self.tmp.path())
            .output()
            .expect("run reducer-rs")
    }

    /// Scratch directories left under this sandbox's temp root.
    pub fn scratch_leftovers(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        for entry in fs::read_dir(self.tmp.path()).expect("read scratch root") {
            let entry = entry.expect("dir entry");
            let name = entry.file_name();
            if name.to_string_lossy().starts_with("reducer-") {
                out.push(entry.path());
            }
        }
        out
    }
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "reducer failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
}
