//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Prints |
//! |---------|--------|
//! | `cname` | canonical name of the reduced selection |
//! | `features` | full closure, dependencies first |
//! | `elements` | platform and element features of the closure |
//! | `flags` | flag features of the closure |
//! | `platform` | the one platform of the closure |
//! | `ignore` | ignored features the closure reached |
//! | `params` | merged parameters as shell variables |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - comma-joined lists, shell assignments
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! garden-feat --verbose -f kvm,gardener cname
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod commands;
mod output;
mod shell;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
pub use shell::{render_shell_vars, ShellError};
