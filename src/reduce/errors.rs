//! Error types for the reduction driver.
//!
//! Errors are stage-specific: setup failures abort before any reduction
//! work starts, reduction failures abort a run in progress. All enums
//! are `#[non_exhaustive]` so variants can be added without breaking
//! callers; consumers should include a fallback match arm.
//!
//! Oracle rejection of a *candidate* is not an error at all (it is just
//! a failed trial, handled inside the delta loop); everything surfacing
//! here terminates the driver with a diagnostic.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors detected before any reduction work starts.
#[derive(Debug)]
#[non_exhaustive]
pub enum SetupError {
    /// I/O error during setup file operations.
    Io(io::Error),
    /// The oracle script path does not resolve to anything.
    OracleNotFound { path: PathBuf },
    /// The oracle exists but is not an executable regular file.
    OracleNotExecutable { path: PathBuf },
    /// The artifact path does not resolve to anything.
    ArtifactNotFound { path: PathBuf },
    /// The artifact exists but cannot be opened for writing.
    ArtifactNotWritable { path: PathBuf },
    /// A registered pass family's prerequisites are not satisfied.
    PrereqFailed { pass: String, detail: String },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "setup I/O error: {err}"),
            Self::OracleNotFound { path } => {
                write!(f, "oracle not found: {}", path.display())
            }
            Self::OracleNotExecutable { path } => {
                write!(f, "oracle is not executable: {}", path.display())
            }
            Self::ArtifactNotFound { path } => {
                write!(f, "artifact not found: {}", path.display())
            }
            Self::ArtifactNotWritable { path } => {
                write!(f, "artifact is not writable: {}", path.display())
            }
            Self::PrereqFailed { pass, detail } => {
                write!(f, "pass {pass}: prerequisite check failed: {detail}")
            }
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SetupError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Errors that abort a reduction in progress.
#[derive(Debug)]
#[non_exhaustive]
pub enum ReduceError {
    /// I/O error during candidate or best-file operations.
    Io(io::Error),
    /// The startup sanity check failed: the oracle rejects the input,
    /// so there is nothing to reduce.
    InitialRejected { path: PathBuf },
    /// A mid-run sanity check failed: the oracle rejects the current
    /// best, which means a flaky oracle or a pass bug. Continuing from a
    /// corrupted best would break every later result.
    BestRejected { path: PathBuf },
    /// The one-time preprocessor command failed.
    PreprocessorFailed { detail: String },
    /// A terminating signal was caught; workers are down, teardown runs
    /// on the unwind path.
    Interrupted,
}

impl fmt::Display for ReduceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::InitialRejected { path } => {
                write!(
                    f,
                    "oracle rejects the original input: {} (check the test script)",
                    path.display()
                )
            }
            Self::BestRejected { path } => {
                write!(
                    f,
                    "oracle rejects the current best {}; flaky oracle or pass bug",
                    path.display()
                )
            }
            Self::PreprocessorFailed { detail } => {
                write!(f, "preprocessor failed: {detail}")
            }
            Self::Interrupted => write!(f, "interrupted by signal"),
        }
    }
}

impl std::error::Error for ReduceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ReduceError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
