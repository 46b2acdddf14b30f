//! Pass plugin contract.
//!
//! Every transformation pass implements the four-operation capability
//! below and is selected by `(name, arg)`: the name picks a pass family,
//! the arg a sub-pass within it. The driver owns the per-invocation
//! [`PassState`] and threads it through `transform`/`advance` without
//! ever interpreting it, which is what allows speculative rollback: the
//! state that produced an accepted candidate is simply restored.

use std::fmt;
use std::io;
use std::path::Path;

pub mod balanced;
pub mod blank;
pub mod lines;
pub mod registry;
pub mod tokens;

/// Result of one `transform` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformOutcome {
    /// The file now holds the next candidate.
    Transformed,
    /// The pass has exhausted its search space from this state.
    Stop,
}

/// Opaque cursor state owned by the driver between pass calls.
///
/// The driver clones and snapshots these for speculative rollback but
/// never reads the fields; each pass assigns its own meaning to the two
/// cursors. Keeping the state a small `Copy` value makes snapshotting
/// free and keeps pass implementations honest about hidden state: a pass
/// must be able to resume from any state the driver hands back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassState {
    pub chunk: u64,
    pub index: u64,
}

/// A pass prerequisite that is not satisfied on this system.
#[derive(Debug)]
pub struct PrereqError {
    detail: String,
}

impl PrereqError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for PrereqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.detail)
    }
}

impl std::error::Error for PrereqError {}

/// The capability every pass module implements.
///
/// Call protocol for one pass invocation:
/// 1. `new(path, arg)` once, with a scratch copy of the current best.
/// 2. Repeat: `transform(path, arg, state)` on a fresh copy of the best.
///    On [`TransformOutcome::Transformed`], the driver snapshots the
///    returned state and calls `advance` exactly once before consulting
///    the oracle; the advanced state assumes the candidate will be
///    rejected. On acceptance the snapshot is restored instead.
/// 3. The invocation ends when `transform` returns
///    [`TransformOutcome::Stop`] and all in-flight candidates are retired.
///
/// `transform` must be deterministic in `(arg, state)` modulo the bytes
/// of the file it is given, and a pass may touch only that file.
pub trait Pass: Send + Sync {
    /// Checked once at driver startup per distinct pass family. A failure
    /// aborts the driver before any reduction work starts.
    fn check_prereqs(&self) -> Result<(), PrereqError> {
        Ok(())
    }

    /// Produce the initial state for one invocation.
    fn new(&self, path: &Path, arg: &str) -> io::Result<PassState>;

    /// Overwrite `path` with the next candidate, or report exhaustion.
    fn transform(
        &self,
        path: &Path,
        arg: &str,
        state: PassState,
    ) -> io::Result<(TransformOutcome, PassState)>;

    /// Move past the candidate just produced, i.e. the state to continue
    /// from if the oracle rejects it.
    fn advance(&self, path: &Path, arg: &str, state: PassState) -> io::Result<PassState>;
}

/// Maps an unparsable pass argument to an `InvalidInput` error.
pub(crate) fn bad_arg(name: &str, arg: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("pass {name}: unsupported arg '{arg}'"),
    )
}
