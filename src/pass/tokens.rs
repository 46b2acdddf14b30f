//! Token- and byte-granularity removal.
//!
//! These are the expensive tail-end passes: `token` deletes one lexical
//! token per candidate (C-ish lexing via a bytes regex), `byte` deletes
//! a single byte per candidate. Both are option-gated because their
//! search spaces are linear in the artifact size with tiny per-candidate
//! progress.

use std::fs;
use std::io;
use std::path::Path;

use regex::bytes::Regex;

use super::{bad_arg, Pass, PassState, TransformOutcome};

pub struct TokensPass {
    lexer: Regex,
}

impl TokensPass {
    pub fn new() -> Self {
        // Identifiers, numeric-ish literals, whitespace runs, then any
        // single byte. Unicode mode is off so the final `.` arm covers
        // arbitrary bytes and the token list always spans the whole file.
        let lexer = Regex::new(r"(?s-u)[A-Za-z_][A-Za-z0-9_]*|[0-9][0-9A-Za-z_.]*|\s+|.")
            .expect("build token lexer");
        Self { lexer }
    }
}

impl Default for TokensPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for TokensPass {
    fn new(&self, _path: &Path, arg: &str) -> io::Result<PassState> {
        match arg {
            "token" | "byte" => Ok(PassState::default()),
            _ => Err(bad_arg("tokens", arg)),
        }
    }

    fn transform(
        &self,
        path: &Path,
        arg: &str,
        state: PassState,
    ) -> io::Result<(TransformOutcome, PassState)> {
        let data = fs::read(path)?;
        let span = match arg {
            "token" => self
                .lexer
                .find_iter(&data)
                .nth(state.index as usize)
                .map(|m| m.range()),
            "byte" => {
                let i = state.index as usize;
                (i < data.len()).then(|| i..i + 1)
            }
            _ => return Err(bad_arg("tokens", arg)),
        };

        let Some(span) = span else {
            return Ok((TransformOutcome::Stop, state));
        };

        let mut out = Vec::with_capacity(data.len() - span.len());
        out.extend_from_slice(&data[..span.start]);
        out.extend_from_slice(&data[span.end..]);
        fs::write(path, &out)?;
        Ok((TransformOutcome::Transformed, state))
    }

    fn advance(&self, _path: &Path, _arg: &str, mut state: PassState) -> io::Result<PassState> {
        state.index = state.index.saturating_add(1);
        Ok(state)
    }
}
