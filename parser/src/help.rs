//! Plain help and version text rendering.
//!
//! Deliberately minimal: no color, no wrapping. The engine only needs
//! *some* text to carry in the Help/Version outcomes; presentation policy
//! beyond that belongs to callers.

use argspec_core::{ArgSpec, CommandSpec};

/// Renders help text for one command. `path` is the qualified name
/// ("app search" for a subcommand); `inherited` are the persistent
/// arguments visible from ancestors.
pub(crate) fn render(command: &CommandSpec, path: &str, inherited: &[&ArgSpec]) -> String {
    let mut out = String::new();
    match &command.description {
        Some(description) => out.push_str(&format!("{path} - {description}\n")),
        None => {
            out.push_str(path);
            out.push('\n');
        }
    }

    out.push_str(&format!("\nUsage: {path} [OPTIONS]"));
    for spec in command.positional_args() {
        let name = metavar(spec);
        if spec.required {
            out.push_str(&format!(" <{name}>"));
        } else {
            out.push_str(&format!(" [{name}]"));
        }
    }
    if !command.subcommands.is_empty() {
        out.push_str(" <COMMAND>");
    }
    out.push('\n');

    let positionals: Vec<(String, String)> = command
        .positional_args()
        .filter(|s| !s.hidden)
        .map(|s| (format!("<{}>", metavar(s)), describe(s)))
        .collect();
    push_section(&mut out, "Arguments", &positionals);

    let mut options: Vec<(String, String)> = inherited
        .iter()
        .copied()
        .chain(command.args.iter().filter(|s| !s.positional))
        .filter(|s| !s.hidden)
        .map(|s| (option_left(s), describe(s)))
        .collect();
    options.push(("-h, --help".to_string(), "Show help information".to_string()));
    options.push(("-V, --version".to_string(), "Show version information".to_string()));
    push_section(&mut out, "Options", &options);

    let commands: Vec<(String, String)> = command
        .subcommands
        .iter()
        .map(|s| {
            (
                s.name.clone(),
                s.description.clone().unwrap_or_default(),
            )
        })
        .collect();
    push_section(&mut out, "Commands", &commands);

    out
}

/// Renders the version line.
pub(crate) fn version(command: &CommandSpec) -> String {
    match &command.version {
        Some(version) => format!("{} {version}\n", command.name),
        None => format!("{}\n", command.name),
    }
}

fn metavar(spec: &ArgSpec) -> String {
    spec.metavar
        .clone()
        .unwrap_or_else(|| spec.name.to_ascii_uppercase())
}

fn option_left(spec: &ArgSpec) -> String {
    let mut names: Vec<String> = Vec::new();
    if let Some(short) = spec.short {
        names.push(format!("-{short}"));
    }
    if let Some(long) = &spec.long {
        names.push(format!("--{long}"));
    }
    let mut left = names.join(", ");
    if spec.takes_value() {
        left.push_str(&format!(" <{}>", metavar(spec)));
    }
    left
}

fn describe(spec: &ArgSpec) -> String {
    let mut out = spec.help.clone().unwrap_or_default();
    if spec.required && !spec.positional {
        push_note(&mut out, "(required)");
    }
    if !spec.choices.is_empty() {
        push_note(&mut out, &format!("[choices: {}]", spec.choices.join(", ")));
    }
    if let Some(default) = &spec.default_value {
        push_note(&mut out, &format!("[default: {default}]"));
    }
    if spec.deprecated.is_some() {
        push_note(&mut out, "(deprecated)");
    }
    out
}

fn push_note(out: &mut String, note: &str) {
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(note);
}

fn push_section(out: &mut String, title: &str, rows: &[(String, String)]) {
    if rows.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}:\n"));
    let width = rows.iter().map(|(left, _)| left.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> CommandSpec {
        CommandSpec::new("app")
            .with_description("Example tool")
            .with_version("0.1.0")
            .allow_subcommand_positionals()
            .arg(ArgSpec::flag("verbose").short('v').help("Verbose output"))
            .unwrap()
            .arg(
                ArgSpec::option("format")
                    .choices(["json", "text"])
                    .default_value("text"),
            )
            .unwrap()
            .arg(ArgSpec::flag("secret").hidden())
            .unwrap()
            .arg(ArgSpec::positional("file").required())
            .unwrap()
            .subcommand(CommandSpec::new("run").with_description("Run it"))
            .unwrap()
    }

    #[test]
    fn test_help_includes_sections_and_builtins() {
        let spec = spec();
        let text = render(&spec, "app", &[]);
        assert!(text.contains("app - Example tool"));
        assert!(text.contains("Usage: app [OPTIONS] <FILE> <COMMAND>"));
        assert!(text.contains("Arguments:"));
        assert!(text.contains("-v, --verbose"));
        assert!(text.contains("[choices: json, text]"));
        assert!(text.contains("[default: text]"));
        assert!(text.contains("--help"));
        assert!(text.contains("--version"));
        assert!(text.contains("Commands:"));
        assert!(text.contains("run"));
    }

    #[test]
    fn test_help_omits_hidden_args() {
        let spec = spec();
        let text = render(&spec, "app", &[]);
        assert!(!text.contains("--secret"));
    }

    #[test]
    fn test_version_line() {
        let spec = spec();
        assert_eq!(version(&spec), "app 0.1.0\n");
        assert_eq!(version(&CommandSpec::new("bare")), "bare\n");
    }
}
