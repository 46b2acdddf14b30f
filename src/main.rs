use std::process;

use reducer_rs::reduce::signal;
use reducer_rs::{cli, Reducer};

fn main() {
    let invocation = cli::parse_args();

    if let Err(err) = signal::install() {
        eprintln!("reducer-rs: failed to install signal handlers: {err}");
        process::exit(1);
    }

    let mut reducer = match Reducer::new(invocation) {
        Ok(reducer) => reducer,
        Err(err) => {
            eprintln!("reducer-rs: {err}");
            process::exit(1);
        }
    };

    if let Err(err) = reducer.run() {
        eprintln!("reducer-rs: {err}");
        process::exit(1);
    }
}
