//! The speculative parallel delta loop.
//!
//! One invocation drives one `(name, arg)` pass to exhaustion. The loop
//! keeps up to `workers` oracle processes in flight, each testing a
//! candidate produced from a state that assumes every earlier candidate
//! will be rejected. Verdicts are *consumed in submission order* even
//! though workers finish out of order: an acceptance invalidates all
//! later speculation, and in-order consumption is what keeps the
//! correspondence between states and candidates unambiguous: a stale
//! candidate computed from an already-invalidated state line can never
//! be accepted. Within one pass the accepted-candidate sequence is
//! therefore a prefix of what a sequential driver would accept from the
//! same initial state.
//!
//! On acceptance the driver restores the accepted variant's
//! pre-`advance` state: taking the reduction removed the very
//! opportunity that `advance` had moved past.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::pass::registry::RegisteredPass;
use crate::pass::{PassState, TransformOutcome};

use super::errors::ReduceError;
use super::phases::Reducer;
use super::signal;
use super::workspace::ScratchDir;

/// Marker pid for a variant whose worker has already been reaped.
const REAPED: i32 = -1;

/// One in-flight candidate.
struct Variant {
    pid: i32,
    pre_advance: PassState,
    scratch: ScratchDir,
    candidate: PathBuf,
    result: Option<bool>,
}

impl Reducer {
    /// Runs one pass invocation to its terminal condition.
    pub(crate) fn delta_loop(&mut self, entry: &RegisteredPass) -> Result<(), ReduceError> {
        self.stats.pass_started();
        if self.opts.verbose {
            eprintln!(
                "pass start name={} arg={}",
                entry.desc.name, entry.desc.arg
            );
        }
        let mut inflight: VecDeque<Variant> = VecDeque::new();
        let result = self.drive_pass(entry, &mut inflight);
        // Every exit path, error or not, retires whatever is still in
        // flight: workers are killed and reaped, scratch dirs removed.
        while let Some(v) = inflight.pop_front() {
            retire_variant(v);
        }
        result
    }

    fn drive_pass(
        &mut self,
        entry: &RegisteredPass,
        inflight: &mut VecDeque<Variant>,
    ) -> Result<(), ReduceError> {
        let name = entry.desc.name.as_str();
        let arg = entry.desc.arg.as_str();
        let file_name = self.best.file_name().to_os_string();

        // Initial state comes from a scratch copy of the current best.
        let init = self.workspace.scratch()?;
        let init_path = init.path().join(&file_name);
        fs::copy(self.best.path(), &init_path)?;
        let mut state = entry.pass.new(&init_path, arg)?;
        drop(init);

        if self.opts.sanity_check_each_pass {
            self.sanity_check()?;
        }

        let mut good_cnt = 0u64;
        let mut bad_cnt = 0u64;
        let mut since_success = 0u64;
        let mut stopped = false;

        loop {
            if signal::shutdown_requested() {
                return Err(ReduceError::Interrupted);
            }

            // 1. Fill the worker slots with fresh speculation.
            while !stopped && inflight.len() < self.opts.workers {
                let scratch = self.workspace.scratch()?;
                let candidate = scratch.path().join(&file_name);
                fs::copy(self.best.path(), &candidate)?;

                let (outcome, next) = entry.pass.transform(&candidate, arg, state)?;
                state = next;
                if outcome == TransformOutcome::Stop {
                    stopped = true;
                    break;
                }

                // Snapshot before advancing: this is the state to restore
                // if the candidate is accepted.
                let pre_advance = state;
                state = entry.pass.advance(&candidate, arg, state)?;
                if self.opts.fuzz {
                    while self.rng.chance(1, 2) {
                        state = entry.pass.advance(&candidate, arg, state)?;
                    }
                }

                let pid = self
                    .oracle
                    .spawn_worker(scratch.path(), &file_name, self.opts.verbose)?;
                signal::register_worker(pid);
                inflight.push_back(Variant {
                    pid,
                    pre_advance,
                    scratch,
                    candidate,
                    result: None,
                });
            }

            // 2. Drain reaped variants from the head, in submission order.
            while inflight.front().is_some_and(|v| v.pid == REAPED) {
                let v = inflight.pop_front().expect("non-empty after front check");
                let accepted = v.result.expect("reaped variant carries a verdict");
                if accepted {
                    // All later speculation assumed this candidate would
                    // be rejected; cancel it wholesale.
                    while let Some(other) = inflight.pop_front() {
                        retire_variant(other);
                    }
                    if self.opts.print_diff {
                        self.best.print_diff_against(&v.candidate);
                    }
                    self.best.replace_with(&v.candidate)?;
                    state = v.pre_advance;
                    stopped = false;
                    good_cnt += 1;
                    since_success = 0;
                    self.stats.record_worked(name, arg);
                    let size = self.best.size()?;
                    self.best.print_progress(size);
                } else {
                    bad_cnt += 1;
                    since_success += 1;
                    self.stats.record_failed(name, arg);
                }
            }

            // 3. Reap one worker. Its verdict is consumed by step 2 on a
            //    later iteration, once it reaches the head of the list.
            if !inflight.is_empty() {
                match wait_any_child()? {
                    Some((pid, accepted)) => {
                        signal::unregister_worker(pid);
                        if let Some(v) = inflight.iter_mut().find(|v| v.pid == pid) {
                            v.result = Some(accepted);
                            v.pid = REAPED;
                        }
                    }
                    // EINTR: the shutdown check at the loop top decides.
                    None => continue,
                }
            }

            // 4. Give-up heuristic: a pass that keeps producing candidates
            //    without ever landing one gets abandoned.
            if let Some(limit) = self.opts.giveup_after {
                if since_success > limit {
                    if self.opts.verbose {
                        eprintln!("pass giveup name={name} arg={arg} rejected={since_success}");
                    }
                    break;
                }
            }

            // 5. Terminal condition.
            if stopped && inflight.is_empty() {
                break;
            }
        }

        if self.opts.verbose {
            eprintln!("pass done name={name} arg={arg} good={good_cnt} bad={bad_cnt}");
        }
        Ok(())
    }
}

/// Kills (process group), reaps, and discards one variant. Dropping the
/// variant removes its scratch directory.
fn retire_variant(v: Variant) {
    if v.pid != REAPED {
        unsafe {
            libc::killpg(v.pid, libc::SIGTERM);
        }
        loop {
            let mut status: libc::c_int = 0;
            let rc = unsafe { libc::waitpid(v.pid, &mut status, 0) };
            if rc >= 0 {
                break;
            }
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EINTR) {
                continue;
            }
            // ECHILD: someone already reaped it; nothing left to do.
            break;
        }
        signal::unregister_worker(v.pid);
    }
}

/// Blocks until any child exits. `Ok(None)` means the wait was
/// interrupted by a signal. A worker that did not exit cleanly with
/// status 0 counts as a rejection, crashes included.
fn wait_any_child() -> io::Result<Option<(i32, bool)>> {
    let mut status: libc::c_int = 0;
    let pid = unsafe { libc::waitpid(-1, &mut status, 0) };
    if pid < 0 {
        let err = io::Error::last_os_error();
        return match err.raw_os_error() {
            Some(libc::EINTR) => Ok(None),
            _ => Err(err),
        };
    }
    let accepted = libc::WIFEXITED(status) && libc::WEXITSTATUS(status) == 0;
    Ok(Some((pid, accepted)))
}
