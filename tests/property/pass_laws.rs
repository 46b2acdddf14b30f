//! Laws every built-in pass must satisfy, checked against arbitrary
//! small inputs:
//!
//! - Termination: driving `transform`/`advance` against an
//!   always-rejecting oracle reaches `Stop` within a bounded number of
//!   steps.
//! - Strict shrink: every produced candidate is strictly smaller than
//!   the file it was produced from.
//! - Determinism: `transform` is a pure function of `(arg, state)` and
//!   the file bytes.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use proptest::prelude::*;

use reducer_rs::pass::balanced::BalancedPass;
use reducer_rs::pass::blank::BlankPass;
use reducer_rs::pass::lines::LinesPass;
use reducer_rs::pass::tokens::TokensPass;
use reducer_rs::{Pass, TransformOutcome};

/// Pass configurations under test.
fn all_passes() -> Vec<(Arc<dyn Pass>, &'static str, &'static str)> {
    vec![
        (Arc::new(LinesPass) as Arc<dyn Pass>, "lines", "0"),
        (Arc::new(LinesPass) as Arc<dyn Pass>, "lines", "2"),
        (Arc::new(BalancedPass) as Arc<dyn Pass>, "balanced", "parens"),
        (
            Arc::new(BalancedPass) as Arc<dyn Pass>,
            "balanced",
            "parens-only",
        ),
        (Arc::new(BalancedPass) as Arc<dyn Pass>, "balanced", "curlies"),
        (Arc::new(TokensPass::new()) as Arc<dyn Pass>, "tokens", "token"),
        (Arc::new(TokensPass::new()) as Arc<dyn Pass>, "tokens", "byte"),
        (Arc::new(BlankPass) as Arc<dyn Pass>, "blank", "lines"),
        (Arc::new(BlankPass) as Arc<dyn Pass>, "blank", "indent"),
    ]
}

/// Byte soup biased toward the structure the passes care about.
fn file_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            Just(b'a'),
            Just(b'b'),
            Just(b' '),
            Just(b'\t'),
            Just(b'\n'),
            Just(b'('),
            Just(b')'),
            Just(b'{'),
            Just(b'}'),
            any::<u8>(),
        ],
        0..64,
    )
}

/// Drives one pass against an always-rejecting oracle, restoring the
/// file after each candidate, and returns the number of candidates.
fn drive_to_stop(pass: &dyn Pass, arg: &str, path: &Path, contents: &[u8], bound: u32) -> u32 {
    let mut state = pass.new(path, arg).expect("new");
    let mut steps = 0u32;
    loop {
        let before = fs::read(path).expect("read before transform");
        let (outcome, next) = pass.transform(path, arg, state).expect("transform");
        match outcome {
            TransformOutcome::Stop => return steps,
            TransformOutcome::Transformed => {
                let after = fs::read(path).expect("read candidate");
                assert!(
                    after.len() < before.len(),
                    "candidate did not shrink: {} -> {} bytes",
                    before.len(),
                    after.len()
                );
                fs::write(path, contents).expect("restore");
                state = pass.advance(path, arg, next).expect("advance");
                steps += 1;
                assert!(steps < bound, "no Stop after {steps} candidates");
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rejected_chains_terminate_and_shrink(contents in file_strategy()) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("input.c");
        let bound = 64 * (contents.len() as u32 + 4);
        for (pass, _name, arg) in all_passes() {
            fs::write(&path, &contents).expect("seed file");
            drive_to_stop(pass.as_ref(), arg, &path, &contents, bound);
        }
    }

    #[test]
    fn transform_is_deterministic(contents in file_strategy()) {
        let dir = tempfile::tempdir().expect("tempdir");
        for (pass, name, arg) in all_passes() {
            let a = dir.path().join(format!("{name}-{arg}-a.c"));
            let b = dir.path().join(format!("{name}-{arg}-b.c"));
            fs::write(&a, &contents).expect("seed a");
            fs::write(&b, &contents).expect("seed b");

            let state = pass.new(&a, arg).expect("new");
            let (out_a, next_a) = pass.transform(&a, arg, state).expect("transform a");
            let (out_b, next_b) = pass.transform(&b, arg, state).expect("transform b");

            prop_assert_eq!(out_a, out_b);
            prop_assert_eq!(next_a, next_b);
            prop_assert_eq!(fs::read(&a).expect("read a"), fs::read(&b).expect("read b"));
        }
    }
}
