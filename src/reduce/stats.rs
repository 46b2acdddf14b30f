//! Run counters and per-method statistics.

use std::time::{Duration, Instant};

use ahash::AHashMap;

type MethodKey = (String, String);

/// Counters aggregated across the whole run.
#[derive(Debug)]
pub struct RunStats {
    start: Instant,
    invocations: u64,
    worked: AHashMap<MethodKey, u64>,
    failed: AHashMap<MethodKey, u64>,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            invocations: 0,
            worked: AHashMap::new(),
            failed: AHashMap::new(),
        }
    }

    /// Total delta-loop invocations so far.
    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    pub fn pass_started(&mut self) {
        self.invocations = self.invocations.saturating_add(1);
    }

    pub fn record_worked(&mut self, name: &str, arg: &str) {
        *self
            .worked
            .entry((name.to_string(), arg.to_string()))
            .or_default() += 1;
    }

    pub fn record_failed(&mut self, name: &str, arg: &str) {
        *self
            .failed
            .entry((name.to_string(), arg.to_string()))
            .or_default() += 1;
    }

    pub fn worked_count(&self, name: &str, arg: &str) -> u64 {
        self.worked
            .get(&(name.to_string(), arg.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Prints the per-method table to stderr, most successful first.
    pub fn print_summary(&self) {
        let mut keys: Vec<&MethodKey> = self.worked.keys().chain(self.failed.keys()).collect();
        keys.sort();
        keys.dedup();
        keys.sort_by_key(|k| std::cmp::Reverse(self.worked.get(*k).copied().unwrap_or(0)));

        eprintln!("pass statistics:");
        for key in keys {
            let worked = self.worked.get(key).copied().unwrap_or(0);
            let failed = self.failed.get(key).copied().unwrap_or(0);
            eprintln!(
                "  method {} :: {} worked {} times, failed {} times",
                key.0, key.1, worked, failed
            );
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}
