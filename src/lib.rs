#![allow(dead_code)]
//! Driver for a generic delta-debugging reducer.
//!
//! Given a source artifact and an external "interestingness" oracle (an
//! executable that exits zero iff the artifact still exhibits the property
//! of interest), the driver repeatedly applies transformation passes that
//! produce smaller candidate artifacts, keeps every candidate the oracle
//! accepts, and stops when no pass can make further progress. All
//! source-language knowledge lives in the pass modules; the driver itself
//! is domain-agnostic.
//!
//! High-level flow (one run):
//! 1) Seed `<input>.orig` and `<input>.best` beside the artifact.
//! 2) Startup sanity check: the oracle must accept the input.
//! 3) Initial phase: one sweep of the passes keyed by `first_pass_pri`.
//! 4) Main fixpoint: sweeps of the `pri` passes until a sweep stops
//!    shrinking the best file (with an optional one-time preprocessor
//!    step on the first sweep).
//! 5) Cleanup phase: one sweep of the `last_pass_pri` passes.
//! 6) Finalize: copy the best over the input, print statistics.
//!
//! Per pass, the delta loop (`reduce::delta`) speculatively runs up to
//! `workers` oracle processes in parallel while consuming their verdicts
//! in submission order, so parallelism never changes which candidates a
//! sequential run would have accepted first.

pub mod cli;
pub mod pass;
pub mod reduce;

pub use pass::registry::{PassDescriptor, Phase, Registry};
pub use pass::{Pass, PassState, PrereqError, TransformOutcome};
pub use reduce::errors::{ReduceError, SetupError};
pub use reduce::phases::Reducer;

/// Driver configuration, fully resolved by CLI parsing.
///
/// Every field corresponds to one documented option; nothing here is
/// inferred at run time except the `workers` default (CPU count).
#[derive(Clone, Debug)]
pub struct Options {
    /// Maximum number of concurrently running oracle processes per pass.
    pub workers: usize,

    /// Optional preprocessor command, run once at the start of the first
    /// main-phase sweep. Expected to rewrite its file argument in place.
    pub preprocess_cmd: Option<String>,

    /// After each `advance`, keep advancing while a fair coin says heads.
    /// Trades reproducibility for a chance to escape plateaus.
    pub fuzz: bool,

    /// Re-run the best-file sanity check at the start of every pass.
    pub sanity_check_each_pass: bool,

    /// Register the whitespace-sanitation pass group in the main phase.
    pub sanitize: bool,

    /// Skip the initial (`first_pass_pri`) phase entirely.
    pub skip_initial: bool,

    /// Register the slow single-token-removal pass.
    pub slow: bool,

    /// Register the very slow byte-at-a-time removal pass.
    pub very_slow: bool,

    /// Start from an empty registry instead of the built-in catalog.
    pub no_defaults: bool,

    /// Print a unified diff against the previous best on each acceptance.
    pub print_diff: bool,

    /// Keep all scratch directories instead of deleting them.
    pub save_temps: bool,

    /// Reserved: candidate result cache. Parsed and carried but inert.
    pub cache: bool,

    /// Let oracle processes inherit stdout/stderr and log pass activity.
    pub verbose: bool,

    /// Abandon a pass after this many rejections without an acceptance.
    /// `None` disables the heuristic.
    pub giveup_after: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
            preprocess_cmd: None,
            fuzz: false,
            sanity_check_each_pass: false,
            sanitize: false,
            skip_initial: false,
            slow: false,
            very_slow: false,
            no_defaults: false,
            print_diff: false,
            save_temps: false,
            cache: false,
            verbose: false,
            giveup_after: Some(DEFAULT_GIVEUP_AFTER),
        }
    }
}

/// Default rejection budget before the give-up heuristic abandons a pass.
pub const DEFAULT_GIVEUP_AFTER: u64 = 50_000;
