//! Property-based tests for pass state-machine laws.
//!
//! Run with: `cargo test --test property`

mod pass_laws;
