//! Core types and registration-time validation for declarative
//! command-line specs.
//!
//! This crate defines the model side of the argspec engine:
//!
//! - [`ArgSpec`] — one named or positional argument: surface forms
//!   (long/short/aliases), cardinality (flag, count, append, nargs, map),
//!   and per-value constraints (choices, integer range).
//! - [`CommandSpec`] — a command: its arguments in declaration order, its
//!   group constraints (mutually-exclusive, required-together, one-required,
//!   conditional), and nested subcommands.
//! - [`RegistrationError`] / [`validate_command`] — every structural
//!   conflict a tree can contain, caught when the tree is built.
//!
//! The tree is immutable once built; the companion `argspec-parser` crate
//! walks it to turn a token list into a typed result. Specs serialize with
//! [`serde`], so a command tree can also be loaded from a JSON file and
//! checked with [`validate_command`].
//!
//! # Example
//!
//! ```
//! use argspec_core::{ArgSpec, CommandSpec};
//!
//! let spec = CommandSpec::new("build")
//!     .with_description("Compile the project")
//!     .arg(ArgSpec::flag("release").help("Optimized build"))?
//!     .arg(ArgSpec::option("jobs").short('j').range(1, 64))?
//!     .arg(ArgSpec::option("define").short('D').key_value().delimiter(','))?
//!     .exclusive(["release", "jobs"])?;
//!
//! assert!(spec.find_arg("define").unwrap().map);
//! # Ok::<(), argspec_core::RegistrationError>(())
//! ```

mod types;
mod validate;

pub use types::{ArgSpec, CommandSpec, ConditionalRule};
pub use validate::{RegistrationError, validate_command};
