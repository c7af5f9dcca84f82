//! Binary entry point for the `lzfse` command-line tool.
//!
//! # Control flow
//!
//! 1. [`parse_args`] processes all flags and builds a [`ParsedArgs`] value.
//! 2. [`run`] dispatches to decoding or listing and returns an exit code.
//!
//! Several inputs decoding to files are processed in parallel on the rayon
//! pool; anything writing to stdout runs in order.

use rayon::prelude::*;

use lzfse::cli::args::{parse_args, OpMode, ParsedArgs};
use lzfse::cli::constants::{set_display_level, PROGRAM_NAME, WELCOME_MESSAGE_FMT};
use lzfse::io::{decode_file, list_file, Output};

/// Execute the operation selected by argument parsing.
///
/// Returns the process exit code (0 = success, 1 = at least one input failed).
fn run(args: ParsedArgs) -> i32 {
    set_display_level(args.display_level);
    lzfse::displaylevel!(
        3,
        "{}",
        WELCOME_MESSAGE_FMT
            .replacen("{}", PROGRAM_NAME, 1)
            .replacen("{}", lzfse::LZFSE_VERSION_STRING, 1)
            .replacen("{}", &(std::mem::size_of::<*const ()>() * 8).to_string(), 1)
    );

    let failures = match args.op_mode {
        OpMode::List => args
            .jobs
            .iter()
            .filter(|(input, _)| match list_file(input) {
                Ok(_) => false,
                Err(e) => {
                    lzfse::displaylevel!(1, "{}: {:#}\n", PROGRAM_NAME, e);
                    true
                }
            })
            .count(),
        OpMode::Decode => {
            let decode_one = |(input, output): &(std::path::PathBuf, Output)| {
                match decode_file(input, output, &args.prefs) {
                    Ok(_) => false,
                    Err(e) => {
                        lzfse::displaylevel!(1, "{}: {:#}\n", PROGRAM_NAME, e);
                        true
                    }
                }
            };
            if args.jobs.iter().any(|(_, o)| *o == Output::Stdout) {
                args.jobs.iter().filter(|&j| decode_one(j)).count()
            } else {
                args.jobs.par_iter().filter(|&j| decode_one(j)).count()
            }
        }
    };

    if failures > 0 {
        lzfse::displaylevel!(2, "{} of {} inputs failed\n", failures, args.jobs.len());
        1
    } else {
        0
    }
}

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => match e.downcast::<clap::Error>() {
            // --help / --version and clap's own usage errors.
            Ok(clap_err) => clap_err.exit(),
            Err(e) => lzfse::end_process!(1, "{}", e),
        },
    };
    std::process::exit(run(args));
}
