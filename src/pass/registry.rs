//! Pass registry and phase ordering.
//!
//! The registry is a process-wide ordered list of pass descriptors
//! assembled once at startup: the built-in catalog (unless disabled),
//! then the option-gated groups, then any user-added passes. Each
//! descriptor carries up to three priority keys; presence of a key means
//! "run in that phase at that priority". Lower priorities run first and
//! ties keep registration order.

use std::sync::Arc;

use crate::reduce::errors::SetupError;
use crate::Options;

use super::balanced::BalancedPass;
use super::blank::BlankPass;
use super::lines::LinesPass;
use super::tokens::TokensPass;
use super::Pass;

/// Which priority key orders a sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Initial passes, run once before the main loop.
    First,
    /// Main fixpoint passes, swept until the best file stops shrinking.
    Main,
    /// Cleanup passes, run once after the fixpoint.
    Last,
}

impl Phase {
    fn priority(self, desc: &PassDescriptor) -> Option<u32> {
        match self {
            Phase::First => desc.first_pass_pri,
            Phase::Main => desc.pri,
            Phase::Last => desc.last_pass_pri,
        }
    }
}

/// Immutable record describing one (pass family, sub-pass) registration.
#[derive(Clone, Debug)]
pub struct PassDescriptor {
    /// Pass family identifier.
    pub name: String,
    /// Sub-pass selector, passed verbatim to the pass.
    pub arg: String,
    pub first_pass_pri: Option<u32>,
    pub pri: Option<u32>,
    pub last_pass_pri: Option<u32>,
}

/// A descriptor bound to its implementation.
#[derive(Clone)]
pub struct RegisteredPass {
    pub desc: PassDescriptor,
    pub pass: Arc<dyn Pass>,
}

/// Ordered container of registered passes.
#[derive(Default)]
pub struct Registry {
    passes: Vec<RegisteredPass>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("passes", &self.passes.iter().map(|p| &p.desc).collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry for a run: built-in catalog plus gated groups.
    pub fn with_options(opts: &Options) -> Self {
        let mut reg = Self::new();
        let blank: Arc<dyn Pass> = Arc::new(BlankPass);
        let lines: Arc<dyn Pass> = Arc::new(LinesPass);
        let balanced: Arc<dyn Pass> = Arc::new(BalancedPass);

        if !opts.no_defaults {
            reg.add(desc("blank", "lines", Some(10), None, None), Arc::clone(&blank));
            reg.add(desc("lines", "0", Some(20), Some(410), None), Arc::clone(&lines));
            reg.add(desc("lines", "1", Some(21), Some(411), None), Arc::clone(&lines));
            reg.add(desc("lines", "2", Some(22), Some(412), None), Arc::clone(&lines));
            reg.add(desc("lines", "10", Some(23), Some(413), None), Arc::clone(&lines));
            reg.add(
                desc("balanced", "parens", None, Some(430), None),
                Arc::clone(&balanced),
            );
            reg.add(
                desc("balanced", "curlies", None, Some(432), None),
                Arc::clone(&balanced),
            );
            reg.add(
                desc("balanced", "squares", None, Some(434), None),
                Arc::clone(&balanced),
            );
            reg.add(
                desc("balanced", "parens-only", None, Some(440), Some(1010)),
                Arc::clone(&balanced),
            );
            reg.add(
                desc("balanced", "curlies-only", None, Some(442), Some(1012)),
                Arc::clone(&balanced),
            );
            reg.add(desc("blank", "indent", None, None, Some(1000)), Arc::clone(&blank));
        }

        if opts.sanitize {
            reg.add(desc("blank", "lines", None, Some(100), None), Arc::clone(&blank));
            reg.add(desc("blank", "indent", None, Some(102), None), Arc::clone(&blank));
        }
        if opts.slow {
            reg.add(
                desc("tokens", "token", None, Some(900), None),
                Arc::new(TokensPass::new()),
            );
        }
        if opts.very_slow {
            reg.add(
                desc("tokens", "byte", None, Some(950), Some(1050)),
                Arc::new(TokensPass::new()),
            );
        }

        reg
    }

    /// Appends a pass. Registration order is the tie-break within a phase.
    pub fn add(&mut self, desc: PassDescriptor, pass: Arc<dyn Pass>) {
        self.passes.push(RegisteredPass { desc, pass });
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Yields the passes participating in `phase`, ascending by that
    /// phase's priority key, ties in registration order.
    pub fn phase_passes(&self, phase: Phase) -> Vec<RegisteredPass> {
        let mut out: Vec<RegisteredPass> = self
            .passes
            .iter()
            .filter(|p| phase.priority(&p.desc).is_some())
            .cloned()
            .collect();
        // Stable sort preserves registration order among equal priorities.
        out.sort_by_key(|p| phase.priority(&p.desc).expect("filtered on key presence"));
        out
    }

    /// Runs `check_prereqs` once per distinct pass family.
    pub fn check_prereqs(&self) -> Result<(), SetupError> {
        let mut checked: Vec<&str> = Vec::new();
        for p in &self.passes {
            if checked.contains(&p.desc.name.as_str()) {
                continue;
            }
            checked.push(&p.desc.name);
            if let Err(err) = p.pass.check_prereqs() {
                return Err(SetupError::PrereqFailed {
                    pass: p.desc.name.clone(),
                    detail: err.to_string(),
                });
            }
        }
        Ok(())
    }

    /// A standalone line pass used by the one-time preprocessing step.
    pub fn adhoc_lines(arg: &str) -> RegisteredPass {
        RegisteredPass {
            desc: desc("lines", arg, None, None, None),
            pass: Arc::new(LinesPass),
        }
    }
}

fn desc(
    name: &str,
    arg: &str,
    first: Option<u32>,
    main: Option<u32>,
    last: Option<u32>,
) -> PassDescriptor {
    PassDescriptor {
        name: name.to_string(),
        arg: arg.to_string(),
        first_pass_pri: first,
        pri: main,
        last_pass_pri: last,
    }
}
