//! The reduction engine: workspace, oracle, delta loop, phases, lifecycle.

pub mod best;
pub mod delta;
pub mod errors;
pub mod oracle;
pub mod phases;
pub mod rng;
pub mod signal;
pub mod stats;
pub mod workspace;

pub use errors::{ReduceError, SetupError};
pub use phases::{Invocation, Reducer};
