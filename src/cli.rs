//! Command-line parser for the reducer.
//!
//! Hand-rolled (no clap dependency) to keep binary size small and boot
//! fast. Value options accept both `--flag value` and `--flag=value`.
//! Exits the process with code 2 on invalid arguments, printing a
//! diagnostic and usage summary to stderr.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::reduce::phases::Invocation;
use crate::Options;

/// Parse `std::env::args_os()` into an [`Invocation`].
pub fn parse_args() -> Invocation {
    let mut args = env::args_os();
    let exe = args.next().unwrap_or_else(|| "reducer-rs".into());
    let mut opts = Options::default();
    let mut positionals: Vec<PathBuf> = Vec::new();

    while let Some(arg) = args.next() {
        let flag = arg.to_string_lossy().into_owned();

        if let Some(rest) = flag.strip_prefix("--cpp=") {
            opts.preprocess_cmd = Some(rest.to_string());
            continue;
        }
        if flag == "--cpp" {
            opts.preprocess_cmd = Some(next_value(&mut args, "--cpp"));
            continue;
        }
        if let Some(rest) = flag.strip_prefix("-n=") {
            opts.workers = parse_workers(rest);
            continue;
        }
        if flag == "-n" {
            opts.workers = parse_workers(&next_value(&mut args, "-n"));
            continue;
        }
        if let Some(rest) = flag.strip_prefix("-n") {
            if rest.chars().all(|c| c.is_ascii_digit()) && !rest.is_empty() {
                opts.workers = parse_workers(rest);
                continue;
            }
        }

        match flag.as_str() {
            "--fuzz" => opts.fuzz = true,
            "--no-default-passes" => opts.no_defaults = true,
            "--no-give-up" => opts.giveup_after = None,
            "--print-diff" => opts.print_diff = true,
            "--sanitize" => opts.sanitize = true,
            "--sanity-checks" => opts.sanity_check_each_pass = true,
            "--save-temps" => opts.save_temps = true,
            "--skip-initial-passes" => opts.skip_initial = true,
            "--slow" => opts.slow = true,
            "--sllooww" => opts.very_slow = true,
            "--verbose" => opts.verbose = true,
            "--help" | "-h" => {
                print_usage(&exe);
                std::process::exit(0);
            }
            _ if flag.starts_with('-') && flag.len() > 1 => {
                eprintln!("unknown flag: {flag}");
                eprintln!();
                print_usage(&exe);
                std::process::exit(2);
            }
            _ => positionals.push(PathBuf::from(arg)),
        }
    }

    if positionals.len() != 2 {
        eprintln!(
            "error: expected exactly <oracle> and <artifact>, got {} positional argument(s)",
            positionals.len()
        );
        eprintln!();
        print_usage(&exe);
        std::process::exit(2);
    }

    let mut positionals = positionals.into_iter();
    Invocation {
        options: opts,
        oracle: positionals.next().expect("two positionals checked"),
        artifact: positionals.next().expect("two positionals checked"),
    }
}

fn next_value(args: &mut env::ArgsOs, flag: &str) -> String {
    let Some(value) = args.next() else {
        eprintln!("{flag} requires a value");
        std::process::exit(2);
    };
    value.to_string_lossy().into_owned()
}

fn parse_workers(s: &str) -> usize {
    let n: usize = s.parse().unwrap_or_else(|_| {
        eprintln!("invalid -n value: {s}");
        std::process::exit(2);
    });
    if n == 0 {
        eprintln!("-n must be >= 1");
        std::process::exit(2);
    }
    n
}

fn print_usage(exe: &OsString) {
    eprintln!(
        "usage: {} [OPTIONS] <oracle> <artifact>

The oracle is an executable run as `oracle <file>` with the candidate's
scratch directory as working directory; exit status 0 keeps a candidate.
The artifact is reduced in place; pristine bytes stay in <artifact>.orig.

OPTIONS:
    --cpp <CMD>            Preprocessor command, run once on the first
                           main-loop sweep (rewrites its file in place)
    --fuzz                 Randomly skip ahead after each candidate
    -n <N>                 Parallel oracle processes (default: CPU count)
    --no-default-passes    Start from an empty pass catalog
    --no-give-up           Never abandon a pass for lack of progress
    --print-diff           Print a diff for every accepted candidate
    --sanitize             Enable the whitespace-sanitation passes
    --sanity-checks        Re-verify the best file before every pass
    --save-temps           Keep scratch directories
    --skip-initial-passes  Go straight to the main pass loop
    --slow                 Enable single-token removal
    --sllooww              Enable byte-at-a-time removal (very slow)
    --verbose              Show oracle output and pass activity
    --help, -h             Show this help",
        exe.to_string_lossy()
    );
}
