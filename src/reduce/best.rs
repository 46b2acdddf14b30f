//! Best-artifact bookkeeping.
//!
//! Two sibling files live beside the input for the duration of a run:
//! `<base>.orig` (a pristine copy of the input, written exactly once)
//! and `<base>.best` (the smallest oracle-accepted artifact so far).
//! The best file is only ever replaced with bytes the oracle has
//! already accepted, and the replacement goes through a temp-file
//! rename so a crash mid-write cannot leave a torn best behind.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::errors::SetupError;

#[derive(Debug)]
pub struct BestFile {
    input: PathBuf,
    orig: PathBuf,
    best: PathBuf,
    file_name: OsString,
    orig_size: u64,
}

impl BestFile {
    /// Resolves the artifact, verifies writability, and seeds the
    /// `.orig` and `.best` siblings from it.
    pub fn seed(input: &Path) -> Result<Self, SetupError> {
        let input = input
            .canonicalize()
            .map_err(|_| SetupError::ArtifactNotFound {
                path: input.to_path_buf(),
            })?;
        fs::OpenOptions::new()
            .append(true)
            .open(&input)
            .map_err(|_| SetupError::ArtifactNotWritable {
                path: input.clone(),
            })?;
        let file_name = input
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| SetupError::ArtifactNotFound {
                path: input.clone(),
            })?;

        let orig = sibling(&input, "orig");
        let best = sibling(&input, "best");
        fs::copy(&input, &orig)?;
        fs::copy(&input, &best)?;
        let orig_size = fs::metadata(&best)?.len();

        Ok(Self {
            input,
            orig,
            best,
            file_name,
            orig_size,
        })
    }

    /// Path of the current best artifact.
    pub fn path(&self) -> &Path {
        &self.best
    }

    pub fn input_path(&self) -> &Path {
        &self.input
    }

    pub fn orig_path(&self) -> &Path {
        &self.orig
    }

    /// Canonical candidate file name: every scratch copy of the best
    /// uses this name so oracles that key on the file name keep working.
    pub fn file_name(&self) -> &OsStr {
        &self.file_name
    }

    pub fn orig_size(&self) -> u64 {
        self.orig_size
    }

    pub fn size(&self) -> io::Result<u64> {
        Ok(fs::metadata(&self.best)?.len())
    }

    /// Replaces the best with an accepted candidate, via temp + rename.
    pub fn replace_with(&self, candidate: &Path) -> io::Result<()> {
        let tmp = sibling(&self.best, "tmp");
        fs::copy(candidate, &tmp)?;
        fs::rename(&tmp, &self.best)?;
        Ok(())
    }

    /// Best-effort unified diff of the incoming candidate against the
    /// current best, printed to stdout. A missing `diff` binary only
    /// disables the printout.
    pub fn print_diff_against(&self, candidate: &Path) {
        if let Ok(output) = Command::new("diff")
            .arg("-u")
            .arg(&self.best)
            .arg(candidate)
            .output()
        {
            let mut stdout = io::stdout().lock();
            let _ = stdout.write_all(&output.stdout);
            let _ = stdout.flush();
        }
    }

    /// Human progress line: how much of the original is gone.
    pub fn print_progress(&self, size: u64) {
        let denom = self.orig_size.max(1) as f64;
        let pct = 100.0 * (1.0 - size as f64 / denom);
        eprintln!("({pct:.1} %, {size} bytes)");
    }

    /// Writes the best over the original input. Called exactly once, at
    /// termination; `.orig` keeps the pristine bytes.
    pub fn finalize(&self) -> io::Result<()> {
        fs::copy(&self.best, &self.input)?;
        Ok(())
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
