//! Chunked line removal with halving granularity.
//!
//! The workhorse pass: it deletes runs of whole lines, starting with
//! large chunks and halving the chunk size every time the cursor wraps
//! past the end of the file. The sub-pass argument is a granularity
//! shift: arg `g` starts the chunk at `line_count >> g`, so arg `0`
//! first offers the whole file as a single candidate and arg `10`
//! starts near single-line granularity.

use std::fs;
use std::io;
use std::path::Path;

use memchr::memchr_iter;

use super::{bad_arg, Pass, PassState, TransformOutcome};

pub struct LinesPass;

impl LinesPass {
    fn granularity(arg: &str) -> io::Result<u32> {
        arg.parse::<u32>().map_err(|_| bad_arg("lines", arg))
    }
}

impl Pass for LinesPass {
    fn new(&self, path: &Path, arg: &str) -> io::Result<PassState> {
        let shift = Self::granularity(arg)?;
        let data = fs::read(path)?;
        let lines = count_lines(&data);
        let chunk = if shift >= 63 {
            1
        } else {
            (lines >> shift).max(1)
        };
        Ok(PassState { chunk, index: 0 })
    }

    fn transform(
        &self,
        path: &Path,
        _arg: &str,
        mut state: PassState,
    ) -> io::Result<(TransformOutcome, PassState)> {
        let data = fs::read(path)?;
        let lines = split_lines(&data);
        let len = lines.len() as u64;
        if len == 0 {
            return Ok((TransformOutcome::Stop, state));
        }

        // Wrap the cursor, halving the chunk, until a removable range
        // remains. Stops once single-line granularity is exhausted.
        while state.index >= len {
            if state.chunk <= 1 {
                return Ok((TransformOutcome::Stop, state));
            }
            state.chunk /= 2;
            state.index = 0;
        }

        let start = state.index as usize;
        let end = state.index.saturating_add(state.chunk).min(len) as usize;
        let mut out = Vec::with_capacity(data.len());
        for (i, line) in lines.iter().enumerate() {
            if i < start || i >= end {
                out.extend_from_slice(line);
            }
        }
        fs::write(path, &out)?;
        Ok((TransformOutcome::Transformed, state))
    }

    fn advance(&self, _path: &Path, _arg: &str, mut state: PassState) -> io::Result<PassState> {
        state.index = state.index.saturating_add(state.chunk);
        Ok(state)
    }
}

/// Splits into line slices that keep their terminators, so removal and
/// reassembly round-trip byte-exactly (including a missing final newline).
fn split_lines(data: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    for nl in memchr_iter(b'\n', data) {
        lines.push(&data[start..=nl]);
        start = nl + 1;
    }
    if start < data.len() {
        lines.push(&data[start..]);
    }
    lines
}

fn count_lines(data: &[u8]) -> u64 {
    split_lines(data).len() as u64
}
