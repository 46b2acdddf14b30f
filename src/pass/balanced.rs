//! Balanced-bracket reduction.
//!
//! Sub-passes either delete a whole balanced span including its
//! delimiters (`parens`, `curlies`, `squares`) or delete just the
//! delimiter pair and keep the contents (`parens-only`, `curlies-only`).
//! The cursor indexes matched open-delimiter occurrences from the left;
//! unmatched delimiters are skipped rather than treated as errors.

use std::fs;
use std::io;
use std::path::Path;

use memchr::memchr_iter;

use super::{bad_arg, Pass, PassState, TransformOutcome};

pub struct BalancedPass;

struct Delims {
    open: u8,
    close: u8,
    pair_only: bool,
}

fn delims(arg: &str) -> Option<Delims> {
    let (open, close, pair_only) = match arg {
        "parens" => (b'(', b')', false),
        "curlies" => (b'{', b'}', false),
        "squares" => (b'[', b']', false),
        "parens-only" => (b'(', b')', true),
        "curlies-only" => (b'{', b'}', true),
        _ => return None,
    };
    Some(Delims {
        open,
        close,
        pair_only,
    })
}

impl Pass for BalancedPass {
    fn new(&self, _path: &Path, arg: &str) -> io::Result<PassState> {
        if delims(arg).is_none() {
            return Err(bad_arg("balanced", arg));
        }
        Ok(PassState::default())
    }

    fn transform(
        &self,
        path: &Path,
        arg: &str,
        state: PassState,
    ) -> io::Result<(TransformOutcome, PassState)> {
        let d = delims(arg).ok_or_else(|| bad_arg("balanced", arg))?;
        let data = fs::read(path)?;

        let mut seen = 0u64;
        for pos in memchr_iter(d.open, &data) {
            let Some(end) = matching_close(&data, pos, d.open, d.close) else {
                continue;
            };
            if seen < state.index {
                seen += 1;
                continue;
            }

            let mut out = Vec::with_capacity(data.len());
            if d.pair_only {
                out.extend_from_slice(&data[..pos]);
                out.extend_from_slice(&data[pos + 1..end]);
                out.extend_from_slice(&data[end + 1..]);
            } else {
                out.extend_from_slice(&data[..pos]);
                out.extend_from_slice(&data[end + 1..]);
            }
            fs::write(path, &out)?;
            return Ok((TransformOutcome::Transformed, state));
        }

        Ok((TransformOutcome::Stop, state))
    }

    fn advance(&self, _path: &Path, _arg: &str, mut state: PassState) -> io::Result<PassState> {
        state.index = state.index.saturating_add(1);
        Ok(state)
    }
}

/// Finds the close delimiter matching the open at `open_pos`, honoring
/// nesting of the same delimiter kind. Returns `None` when unbalanced.
fn matching_close(data: &[u8], open_pos: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in data.iter().enumerate().skip(open_pos) {
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}
