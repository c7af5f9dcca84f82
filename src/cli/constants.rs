// cli/constants.rs: program identity strings, the display-level global and
// the diagnostic macros shared by the library, the I/O layer and the binary.

use std::sync::atomic::{AtomicU32, Ordering};

// ── String / identity constants ──────────────────────────────────────────────
pub const PROGRAM_NAME: &str = "lzfse";
pub const LZFSE_EXTENSION: &str = ".lzfse";
/// Appended to the input name when it carries no `.lzfse` extension.
pub const DECODED_EXTENSION: &str = ".out";

/// Welcome line printed at display level 3 and above.
/// Caller substitutes: program name, version string, pointer-width bits.
pub const WELCOME_MESSAGE_FMT: &str = "*** {} v{} {}-bit ***\n";

// ── Size multiplier ────────────────────────────────────────────────
pub const MB: u64 = 1 << 20;

// ── Display level global ─────────────────────────────────────────────────────
//
// 0 = no output; 1 = errors only; 2 = normal (downgradable); 3 = non-downgradable; 4 = verbose
//
// Library code (decode driver, container normalizer) only ever prints at
// level 4, so embedding the crate never produces output unless asked to.
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

// ── Display helpers ──────────────────────────────────────────────────────────
//
//   displayout!(...)      → print!(...)
//   displaylevel!(l, ...) → if display_level() >= l { eprint!(...) }

/// Print to stdout.
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { print!($($arg)*) };
}

/// Conditionally print to stderr at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}

/// Terminate the process with an error code after printing a diagnostic.
///
/// Usage: `end_process!(exit_code, "message {}", arg)`
#[macro_export]
macro_rules! end_process {
    ($error:expr, $($arg:tt)*) => {{
        #[cfg(debug_assertions)]
        eprint!("Error in {}, line {} : \n", file!(), line!());
        if $crate::cli::constants::display_level() >= 1 {
            eprint!("Error {} : ", $error);
            eprint!($($arg)*);
            eprint!("\n");
        }
        std::process::exit($error as i32);
    }};
}
