//! Command-line adapter for the argspec engine.
//!
//! Loads a [`CommandSpec`] from a JSON file and checks it, parses a command
//! line against it, or prints its generated help. The binary's own argument
//! surface is itself declared and parsed with argspec, and it implements
//! the canonical exit-code policy: 0 for success and help/version, 2 for
//! parse errors, 1 for application failures.

use std::fs;
use std::io::Read;
use std::process::ExitCode;

use argspec_core::{ArgSpec, CommandSpec, RegistrationError, validate_command};
use argspec_parser::{ParseOutcome, ParseResult, parse, parse_env};

fn build_cli() -> Result<CommandSpec, RegistrationError> {
    CommandSpec::new("argspec")
        .with_description("Validate and exercise declarative command-line specs")
        .with_version(env!("CARGO_PKG_VERSION"))
        .arg(
            ArgSpec::flag("verbose")
                .short('v')
                .persistent()
                .help("Enable debug logging"),
        )?
        .subcommand(
            CommandSpec::new("check")
                .with_description("Validate a JSON spec file")
                .arg(ArgSpec::positional("spec").required().metavar("SPEC.JSON"))?,
        )?
        .subcommand(
            CommandSpec::new("parse")
                .with_description("Parse a command line against a spec and print the result")
                .arg(
                    ArgSpec::option("spec")
                        .short('s')
                        .required()
                        .metavar("FILE")
                        .help("JSON spec file"),
                )?
                .arg(ArgSpec::flag("compact").help("One-line JSON output"))?
                .arg(
                    ArgSpec::positional("line")
                        .metavar("LINE")
                        .help("Command line to parse (read from stdin when omitted)"),
                )?,
        )?
        .subcommand(
            CommandSpec::new("explain")
                .with_description("Print the generated help text of a spec")
                .arg(ArgSpec::option("spec").short('s').required().metavar("FILE"))?,
        )
}

fn main() -> ExitCode {
    let cli = match build_cli() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    let result = match parse_env(&cli) {
        Ok(ParseOutcome::Matches(result)) => result,
        Ok(ParseOutcome::Help(text)) | Ok(ParseOutcome::Version(text)) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    init_logging(result.get_flag("verbose"));
    print_warnings(&result);

    let Some(sub) = result.subcommand_result() else {
        eprintln!("error: missing subcommand (see --help)");
        return ExitCode::from(2);
    };

    let status = match result.subcommand() {
        "check" => run_check(sub),
        "parse" => run_parse(sub),
        "explain" => run_explain(sub),
        other => Err(format!("unhandled subcommand '{other}'")),
    };

    match status {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Deprecation notices live on each level of the result tree.
fn print_warnings(result: &ParseResult) {
    for warning in result.warnings() {
        eprintln!("warning: {warning}");
    }
    if let Some(child) = result.subcommand_result() {
        print_warnings(child);
    }
}

fn run_check(args: &ParseResult) -> Result<ExitCode, String> {
    let Some(path) = args.get_string("spec") else {
        return Err("missing spec path".to_string());
    };
    let spec = load_spec(path)?;
    println!(
        "Spec '{}' is valid: {} argument(s), {} subcommand(s).",
        spec.name,
        spec.args.len(),
        spec.subcommands.len()
    );
    Ok(ExitCode::SUCCESS)
}

fn run_parse(args: &ParseResult) -> Result<ExitCode, String> {
    let Some(path) = args.get_string("spec") else {
        return Err("missing spec path".to_string());
    };
    let spec = load_spec(path)?;

    let tokens = match args.get_string("line") {
        Some(line) => split_line(line),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| format!("failed to read stdin: {err}"))?;
            split_line(&buffer)
        }
    };

    let mut argv = vec![spec.name.clone()];
    argv.extend(tokens);

    match parse(&spec, &argv) {
        Ok(ParseOutcome::Matches(result)) => {
            print_warnings(&result);
            let json = if args.get_flag("compact") {
                serde_json::to_string(&result)
            } else {
                serde_json::to_string_pretty(&result)
            }
            .map_err(|err| format!("failed to serialize result: {err}"))?;
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(ParseOutcome::Help(text)) | Ok(ParseOutcome::Version(text)) => {
            print!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("error: {err}");
            Ok(ExitCode::from(2))
        }
    }
}

fn run_explain(args: &ParseResult) -> Result<ExitCode, String> {
    let Some(path) = args.get_string("spec") else {
        return Err("missing spec path".to_string());
    };
    let spec = load_spec(path)?;

    // The engine renders help for `--help`; reuse that instead of a second
    // renderer.
    let argv = vec![spec.name.clone(), "--help".to_string()];
    match parse(&spec, &argv) {
        Ok(ParseOutcome::Help(text)) => {
            print!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(_) => Err("spec did not produce help output".to_string()),
        Err(err) => Err(format!("failed to render help: {err}")),
    }
}

fn load_spec(path: &str) -> Result<CommandSpec, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("failed to read '{path}': {err}"))?;
    let spec: CommandSpec =
        serde_json::from_str(&raw).map_err(|err| format!("invalid spec JSON in '{path}': {err}"))?;
    validate_command(&spec).map_err(|err| format!("invalid spec '{path}': {err}"))?;
    Ok(spec)
}

fn split_line(line: &str) -> Vec<String> {
    line.split_whitespace().map(ToOwned::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::{build_cli, split_line};

    #[test]
    fn test_cli_spec_builds() {
        let cli = build_cli().expect("cli spec must register cleanly");
        assert_eq!(cli.subcommands.len(), 3);
        assert!(cli.find_arg("verbose").unwrap().persistent);
    }

    #[test]
    fn test_split_line_collapses_whitespace() {
        assert_eq!(split_line("  search  -v hi "), vec!["search", "-v", "hi"]);
        assert!(split_line("").is_empty());
    }
}
