//! Command-line argument parsing for the `lzfse` binary.
//!
//! [`Cli`] is the `clap` definition; [`parse_args_from`] turns an explicit
//! argument list into a validated [`ParsedArgs`] (used by `main` and by the
//! tests), resolving output names and the display level on the way.
//!
//! Bad usage returns an `Err` whose message begins with `"bad usage: "`.

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;

use crate::cli::constants::PROGRAM_NAME;
use crate::config::MAX_OUTPUT_SIZE_DEFAULT;
use crate::io::{default_output_name, DecodePrefs, Output, STDIO_MARK};

/// Decode LZFSE/LZVN streams and prelinked kernel containers.
#[derive(Parser, Debug)]
#[command(name = PROGRAM_NAME, version, about)]
pub struct Cli {
    /// Compressed inputs ("-" reads stdin)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (single input only)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write decoded data to stdout
    #[arg(short = 'c', long)]
    pub stdout: bool,

    /// Overwrite existing output files
    #[arg(short, long)]
    pub force: bool,

    /// Print stream headers instead of decoding
    #[arg(short, long)]
    pub list: bool,

    /// Largest destination buffer to allocate, in bytes
    #[arg(long, default_value_t = MAX_OUTPUT_SIZE_DEFAULT)]
    pub max_size: usize,

    /// More output (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// What the invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    Decode,
    List,
}

/// Validated options and the input → output pairs to process.
#[derive(Debug)]
pub struct ParsedArgs {
    pub op_mode: OpMode,
    pub jobs: Vec<(PathBuf, Output)>,
    pub prefs: DecodePrefs,
    /// Display level to install before running.
    pub display_level: u32,
}

/// Parse `std::env::args()`.
pub fn parse_args() -> anyhow::Result<ParsedArgs> {
    let argv: Vec<String> = std::env::args().collect();
    parse_args_from(&argv)
}

/// Parse an explicit argument list; `argv[0]` is the program name.
pub fn parse_args_from<I, T>(argv: I) -> anyhow::Result<ParsedArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(argv)?;

    let display_level = if cli.quiet { 1 } else { 2 + cli.verbose as u32 }.min(4);
    let prefs = DecodePrefs { max_output_size: cli.max_size, overwrite: cli.force };

    if cli.list {
        let jobs = cli.inputs.into_iter().map(|i| (i, Output::Stdout)).collect();
        return Ok(ParsedArgs { op_mode: OpMode::List, jobs, prefs, display_level });
    }

    if cli.output.is_some() && cli.inputs.len() > 1 {
        return Err(anyhow!("bad usage: --output requires a single input"));
    }
    if cli.output.is_some() && cli.stdout {
        return Err(anyhow!("bad usage: --output and --stdout are exclusive"));
    }

    let jobs = cli
        .inputs
        .into_iter()
        .map(|input| {
            let output = if cli.stdout || (input.as_os_str() == STDIO_MARK && cli.output.is_none()) {
                Output::Stdout
            } else if let Some(o) = &cli.output {
                Output::File(o.clone())
            } else {
                Output::File(default_output_name(&input))
            };
            (input, output)
        })
        .collect();

    Ok(ParsedArgs { op_mode: OpMode::Decode, jobs, prefs, display_level })
}
