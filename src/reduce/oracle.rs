//! Interestingness-oracle invocation.
//!
//! The oracle is an opaque external executable invoked as
//! `oracle <candidate-file-name>` with the candidate's scratch
//! directory as working directory. Exit status zero means the candidate
//! is interesting; everything else, including crashes, counts as a
//! rejection so a flaky sub-tool cannot poison the run. The runner
//! never reads or interprets the candidate itself.

use std::ffi::OsStr;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::errors::SetupError;

#[derive(Debug)]
pub struct Oracle {
    script: PathBuf,
}

impl Oracle {
    /// Resolves the script to an absolute path and verifies it is an
    /// executable regular file. The absolute path matters because every
    /// invocation happens from a scratch directory, not from the
    /// directory the user launched in.
    pub fn new(script: &Path) -> Result<Self, SetupError> {
        let script = script
            .canonicalize()
            .map_err(|_| SetupError::OracleNotFound {
                path: script.to_path_buf(),
            })?;
        let meta = std::fs::metadata(&script)?;
        if !meta.is_file() || meta.permissions().mode() & 0o111 == 0 {
            return Err(SetupError::OracleNotExecutable { path: script });
        }
        Ok(Self { script })
    }

    pub fn path(&self) -> &Path {
        &self.script
    }

    fn command(&self, dir: &Path, file_name: &OsStr, verbose: bool) -> Command {
        let mut cmd = Command::new(&self.script);
        cmd.arg(file_name).current_dir(dir).stdin(Stdio::null());
        if !verbose {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }
        cmd
    }

    /// Runs the oracle to completion. Used by sanity checks, where no
    /// speculative workers are in flight.
    pub fn run(&self, dir: &Path, file_name: &OsStr, verbose: bool) -> io::Result<bool> {
        Ok(self.command(dir, file_name, verbose).status()?.success())
    }

    /// Spawns the oracle as a speculative worker in its own process
    /// group (so cancellation can kill any sub-processes it starts) and
    /// returns the pid. The caller reaps it via `waitpid`.
    pub fn spawn_worker(&self, dir: &Path, file_name: &OsStr, verbose: bool) -> io::Result<i32> {
        let child = self
            .command(dir, file_name, verbose)
            .process_group(0)
            .spawn()?;
        Ok(child.id() as i32)
    }
}
