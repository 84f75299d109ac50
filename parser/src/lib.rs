//! Parsing, validation, and dispatch engine for argspec command trees.
//!
//! This crate turns an immutable [`CommandSpec`] tree plus a token list
//! into a typed [`ParseResult`]. It implements the getopt-like surface
//! grammar:
//!
//! - long options (`--output file`, `--output=file`), with alias and
//!   unambiguous-prefix resolution and typo suggestions;
//! - short options, merged short clusters (`-vvo file`, `-ofile`);
//! - negation (`--no-color`), occurrence counting (`-vvv`), fixed-arity
//!   options (nargs), delimiter-split lists, and `KEY=VALUE` maps;
//! - `--` positional-only mode and a negative-number heuristic;
//! - subcommand routing with persistent-argument push-down and bubble-up;
//! - post-parse constraint validation (required, exclusive,
//!   required-together, one-required, conditional, integer ranges) with
//!   defaults applied first.
//!
//! Help and version requests are terminal [`ParseOutcome`] variants, not
//! errors and not process exits; the thin CLI adapter decides what to do
//! with them.
//!
//! # Example
//!
//! ```
//! use argspec_core::{ArgSpec, CommandSpec};
//! use argspec_parser::{ParseOutcome, parse};
//!
//! let spec = CommandSpec::new("app")
//!     .arg(ArgSpec::flag("verbose").short('v')).unwrap()
//!     .arg(ArgSpec::option("output").short('o')).unwrap();
//!
//! let argv: Vec<String> = ["app", "-vo", "out.txt"]
//!     .iter().map(ToString::to_string).collect();
//! match parse(&spec, &argv).unwrap() {
//!     ParseOutcome::Matches(result) => {
//!         assert!(result.get_flag("verbose"));
//!         assert_eq!(result.get_string("output"), Some("out.txt"));
//!     }
//!     _ => unreachable!(),
//! }
//! ```

mod collector;
mod constraints;
mod engine;
mod error;
mod help;
mod resolver;
mod result;
mod suggest;

use argspec_core::CommandSpec;

pub use engine::ParseOutcome;
pub use error::ParseError;
pub use result::ParseResult;

/// Parses a full token list against a command tree.
///
/// `argv[0]` is the program-name placeholder and is skipped by convention.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered while consuming tokens, or
/// the first constraint violation found after defaults are applied.
pub fn parse(command: &CommandSpec, argv: &[String]) -> Result<ParseOutcome, ParseError> {
    engine::Session::new(command, Vec::new(), command.name.clone()).run(argv)
}

/// Parses the process's real argument vector.
pub fn parse_env(command: &CommandSpec) -> Result<ParseOutcome, ParseError> {
    let argv: Vec<String> = std::env::args().collect();
    parse(command, &argv)
}
