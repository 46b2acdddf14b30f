//! Scratch workspace: per-candidate temporary directories.
//!
//! Every candidate (and every sanity check) gets a fresh directory under
//! the system temp root, named `reducer-XXXXXX`. A directory lives
//! exactly as long as its [`ScratchDir`] handle: retiring a candidate
//! drops the handle and the directory with it, so both normal
//! termination and the signal-unwind path leave no scratch behind.
//! With save-temps set, directories are detached from their handles at
//! creation and survive the run.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Factory for scratch directories.
#[derive(Debug)]
pub struct Workspace {
    save_temps: bool,
}

impl Workspace {
    pub fn new(save_temps: bool) -> Self {
        Self { save_temps }
    }

    /// Creates a fresh scratch directory. Failure here is fatal to the
    /// run; callers propagate it.
    pub fn scratch(&self) -> io::Result<ScratchDir> {
        let dir = tempfile::Builder::new().prefix("reducer-").tempdir()?;
        if self.save_temps {
            let path = dir.into_path();
            Ok(ScratchDir { dir: None, path })
        } else {
            let path = dir.path().to_path_buf();
            Ok(ScratchDir {
                dir: Some(dir),
                path,
            })
        }
    }
}

/// Handle to one scratch directory.
///
/// Dropping the handle removes the directory recursively unless it was
/// created in save-temps mode.
pub struct ScratchDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    pub fn path(&self) -> &Path {
        &self.path
    }
}
