//! Phase controller: startup checks, initial/main/cleanup phases,
//! fixpoint detection, and finalization.
//!
//! The main phase sweeps the `pri` passes until a full sweep fails to
//! shrink the best file. The optional preprocessor step runs once, at
//! the top of the first sweep, and is the only place the best file is
//! allowed to grow; sweep sizes are measured after it so the fixpoint
//! logic keeps running.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::pass::registry::{Phase, Registry};
use crate::Options;

use super::best::BestFile;
use super::errors::{ReduceError, SetupError};
use super::oracle::Oracle;
use super::rng::XorShift64;
use super::stats::RunStats;
use super::workspace::Workspace;

/// A fully parsed command line: options plus the two positionals.
pub struct Invocation {
    pub options: Options,
    pub oracle: PathBuf,
    pub artifact: PathBuf,
}

/// The orchestrator. All run state lives here and is threaded through
/// the delta loop; nothing is process-global except the signal
/// registry.
#[derive(Debug)]
pub struct Reducer {
    pub(crate) opts: Options,
    pub(crate) registry: Registry,
    pub(crate) workspace: Workspace,
    pub(crate) oracle: Oracle,
    pub(crate) best: BestFile,
    pub(crate) stats: RunStats,
    pub(crate) rng: XorShift64,
}

impl Reducer {
    /// Validates the invocation and seeds the on-disk state, using the
    /// registry built from the options.
    pub fn new(inv: Invocation) -> Result<Self, SetupError> {
        let registry = Registry::with_options(&inv.options);
        Self::with_registry(inv, registry)
    }

    /// Like [`Reducer::new`] but with a caller-assembled registry, for
    /// embedders that add their own passes.
    ///
    /// Prerequisite checks run before the best file is seeded and before
    /// any scratch directory exists, so a missing pass dependency aborts
    /// with zero side effects.
    pub fn with_registry(inv: Invocation, registry: Registry) -> Result<Self, SetupError> {
        let oracle = Oracle::new(&inv.oracle)?;
        registry.check_prereqs()?;
        let best = BestFile::seed(&inv.artifact)?;
        let workspace = Workspace::new(inv.options.save_temps);
        let rng = XorShift64::new(std::process::id() as u64);
        Ok(Self {
            opts: inv.options,
            registry,
            workspace,
            oracle,
            best,
            stats: RunStats::new(),
            rng,
        })
    }

    /// Runs the whole reduction to the fixpoint and finalizes.
    pub fn run(&mut self) -> Result<(), ReduceError> {
        // Startup sanity check, unconditional: catches test-script bugs
        // before any time is spent.
        if !self.oracle_accepts_best()? {
            return Err(ReduceError::InitialRejected {
                path: self.best.input_path().to_path_buf(),
            });
        }

        if !self.opts.skip_initial {
            for pass in self.registry.phase_passes(Phase::First) {
                self.delta_loop(&pass)?;
            }
        }

        let mut sweep = 0u64;
        loop {
            if sweep == 0 {
                self.preprocess_once()?;
            }
            let size_prev = self.best.size()?;
            for pass in self.registry.phase_passes(Phase::Main) {
                self.delta_loop(&pass)?;
            }
            let size_now = self.best.size()?;
            sweep += 1;
            if size_now >= size_prev {
                break;
            }
        }

        for pass in self.registry.phase_passes(Phase::Last) {
            self.delta_loop(&pass)?;
        }

        self.finalize()
    }

    /// Copies the best into a fresh scratch dir under the canonical name
    /// and asks the oracle.
    fn oracle_accepts_best(&mut self) -> Result<bool, ReduceError> {
        let scratch = self.workspace.scratch()?;
        let dst = scratch.path().join(self.best.file_name());
        fs::copy(self.best.path(), &dst)?;
        let ok = self
            .oracle
            .run(scratch.path(), self.best.file_name(), self.opts.verbose)?;
        Ok(ok)
    }

    /// Asserts that the on-disk best is still interesting. A rejection
    /// here means a flaky oracle or a pass bug; the driver aborts rather
    /// than continue from a corrupted best.
    pub(crate) fn sanity_check(&mut self) -> Result<(), ReduceError> {
        if self.oracle_accepts_best()? {
            Ok(())
        } else {
            Err(ReduceError::BestRejected {
                path: self.best.path().to_path_buf(),
            })
        }
    }

    /// The one-time preprocessing step, run at the top of the first
    /// main-phase sweep when a preprocessor command is configured:
    /// coarse line pass (drops includes quickly), preprocessor over a
    /// scratch copy of the best, copy back, re-check, then line passes
    /// at increasing granularity.
    fn preprocess_once(&mut self) -> Result<(), ReduceError> {
        let Some(cmd) = self.opts.preprocess_cmd.clone() else {
            return Ok(());
        };

        let coarse = Registry::adhoc_lines("0");
        self.delta_loop(&coarse)?;

        let scratch = self.workspace.scratch()?;
        let work = scratch.path().join(self.best.file_name());
        fs::copy(self.best.path(), &work)?;

        let mut parts = cmd.split_whitespace();
        let Some(program) = parts.next() else {
            return Err(ReduceError::PreprocessorFailed {
                detail: "empty command".to_string(),
            });
        };
        let mut command = Command::new(program);
        command
            .args(parts)
            .arg(self.best.file_name())
            .current_dir(scratch.path())
            .stdin(Stdio::null());
        if !self.opts.verbose {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        let status = command
            .status()
            .map_err(|err| ReduceError::PreprocessorFailed {
                detail: format!("{program}: {err}"),
            })?;
        if !status.success() {
            return Err(ReduceError::PreprocessorFailed {
                detail: format!("{program} exited with {status}"),
            });
        }

        // The only write to the best that is not oracle-gated; the
        // sanity check right after restores the invariant or aborts.
        self.best.replace_with(&work)?;
        self.sanity_check()?;

        for arg in ["0", "1", "2", "10"] {
            let pass = Registry::adhoc_lines(arg);
            self.delta_loop(&pass)?;
        }
        Ok(())
    }

    /// Copies the best over the input, prints statistics, emits the
    /// reduced artifact on stdout, and reports elapsed time.
    fn finalize(&mut self) -> Result<(), ReduceError> {
        self.best.finalize()?;
        self.stats.print_summary();

        let bytes = fs::read(self.best.path())?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(&bytes)?;
        stdout.flush()?;

        let final_size = bytes.len() as u64;
        let orig_size = self.best.orig_size();
        let denom = orig_size.max(1) as f64;
        let pct = 100.0 * (1.0 - final_size as f64 / denom);
        eprintln!(
            "orig={} bytes final={} bytes reduced={:.1}% passes={} elapsed_ms={}",
            orig_size,
            final_size,
            pct,
            self.stats.invocations(),
            self.stats.elapsed().as_millis()
        );
        Ok(())
    }
}
