//! Basic parsing example.
//!
//! Builds a small git-like command tree and parses a canned token list,
//! then prints the typed result.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p argspec-parser --example demo
//! ```

use argspec_core::{ArgSpec, CommandSpec, RegistrationError};
use argspec_parser::{ParseOutcome, parse};

fn build_spec() -> Result<CommandSpec, RegistrationError> {
    CommandSpec::new("vcs")
        .with_description("A fictional version control tool")
        .with_version("0.1.0")
        .arg(ArgSpec::flag("verbose").short('v').count().persistent())?
        .subcommand(
            CommandSpec::new("commit")
                .with_description("Record changes")
                .arg(ArgSpec::option("message").short('m').required())?
                .arg(ArgSpec::flag("amend"))?,
        )?
        .subcommand(
            CommandSpec::new("log")
                .with_description("Show history")
                .arg(ArgSpec::option("limit").short('n').range(1, 1000))?,
        )
}

fn main() {
    let spec = match build_spec() {
        Ok(spec) => spec,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    let argv: Vec<String> = ["vcs", "-vv", "commit", "-m", "initial import", "--amend"]
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("Parsing: {argv:?}\n");

    match parse(&spec, &argv) {
        Ok(ParseOutcome::Matches(result)) => {
            println!("verbosity: {}", result.get_count("verbose"));
            println!("subcommand: {}", result.subcommand());
            if let Some(child) = result.subcommand_result() {
                println!("  message: {:?}", child.get_string("message"));
                println!("  amend: {}", child.get_flag("amend"));
                println!("  verbosity (inherited): {}", child.get_count("verbose"));
            }
        }
        Ok(ParseOutcome::Help(text)) | Ok(ParseOutcome::Version(text)) => print!("{text}"),
        Err(err) => eprintln!("error: {err}"),
    }
}
