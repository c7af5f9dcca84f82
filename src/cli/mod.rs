//! Command-line interface for the `lzfse` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings, the `DISPLAY_LEVEL` atomic and the display macros. |
//! | [`args`]      | `clap` definition and `ParsedArgs`: validated jobs and preferences. |

pub mod constants;
pub mod args;
