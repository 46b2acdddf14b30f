//! Whitespace sanitation.
//!
//! Single-candidate passes: each invocation offers exactly one cleaned
//! rendition of the file (`lines` strips whitespace-only lines, `indent`
//! strips leading whitespace) and stops. Cleaning an already-clean file
//! stops immediately so the fixpoint loop cannot spin on no-op
//! candidates.

use std::fs;
use std::io;
use std::path::Path;

use super::{bad_arg, Pass, PassState, TransformOutcome};

pub struct BlankPass;

fn clean(arg: &str, data: &[u8]) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    match arg {
        "lines" => {
            for line in data.split_inclusive(|&b| b == b'\n') {
                let body = line.strip_suffix(b"\n").unwrap_or(line);
                if !body.iter().all(|b| b.is_ascii_whitespace()) {
                    out.extend_from_slice(line);
                }
            }
        }
        "indent" => {
            for line in data.split_inclusive(|&b| b == b'\n') {
                let trimmed = line
                    .iter()
                    .position(|&b| !(b == b' ' || b == b'\t'))
                    .unwrap_or(line.len());
                out.extend_from_slice(&line[trimmed..]);
            }
        }
        _ => return None,
    }
    Some(out)
}

impl Pass for BlankPass {
    fn new(&self, _path: &Path, arg: &str) -> io::Result<PassState> {
        if clean(arg, b"").is_none() {
            return Err(bad_arg("blank", arg));
        }
        Ok(PassState::default())
    }

    fn transform(
        &self,
        path: &Path,
        arg: &str,
        state: PassState,
    ) -> io::Result<(TransformOutcome, PassState)> {
        if state.index > 0 {
            return Ok((TransformOutcome::Stop, state));
        }
        let data = fs::read(path)?;
        let cleaned = clean(arg, &data).ok_or_else(|| bad_arg("blank", arg))?;
        if cleaned == data {
            return Ok((TransformOutcome::Stop, state));
        }
        fs::write(path, &cleaned)?;
        Ok((TransformOutcome::Transformed, state))
    }

    fn advance(&self, _path: &Path, _arg: &str, mut state: PassState) -> io::Result<PassState> {
        state.index = state.index.saturating_add(1);
        Ok(state)
    }
}
