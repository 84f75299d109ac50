//! Spec type definitions for command-line argument modeling.
//!
//! This module defines the declarative data model consumed by the parsing
//! engine: [`ArgSpec`] describes one named or positional argument, and
//! [`CommandSpec`] groups arguments, constraint rules, and nested
//! subcommands. Both types are designed for serialization with [`serde`] so
//! command trees can round-trip through JSON spec files.

use serde::{Deserialize, Serialize};

use crate::validate::{self, RegistrationError};

/// Declarative description of one argument's surface forms and constraints.
///
/// An argument is either *named* (matched by `--long`, `-s`, or an alias) or
/// *positional* (filled from bare tokens in declaration order). Use the
/// constructors [`flag`](ArgSpec::flag), [`option`](ArgSpec::option), and
/// [`positional`](ArgSpec::positional), then chain builder methods; each
/// setter consumes and returns the value.
///
/// The builders normalize kind implications: [`count`](ArgSpec::count)
/// forces a flag, while [`nargs`](ArgSpec::nargs),
/// [`delimiter`](ArgSpec::delimiter), and [`key_value`](ArgSpec::key_value)
/// force accumulating (append) collection.
///
/// # Examples
///
/// ```
/// use argspec_core::ArgSpec;
///
/// let verbose = ArgSpec::flag("verbose").short('v').help("Enable verbose output");
/// assert!(verbose.flag);
/// assert_eq!(verbose.long.as_deref(), Some("verbose"));
/// assert_eq!(verbose.display_name(), "--verbose");
///
/// let output = ArgSpec::option("output").short('o').metavar("FILE");
/// assert!(output.takes_value());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArgSpec {
    /// Internal name, unique within one [`CommandSpec`].
    pub name: String,
    /// Primary long form, matched as `--<long>`.
    pub long: Option<String>,
    /// Single-character short form, matched as `-<short>`.
    pub short: Option<char>,
    /// Additional long forms.
    pub aliases: Vec<String>,
    /// Boolean flag: takes no value.
    pub flag: bool,
    /// Must be present after parsing.
    pub required: bool,
    /// Filled from bare tokens instead of option syntax.
    pub positional: bool,
    /// Occurrence counter (`-vvv` == 3). Implies `flag`.
    pub count: bool,
    /// Accepts the `--no-<long>` form to set the flag false.
    pub negatable: bool,
    /// Repeated occurrences accumulate instead of overwriting.
    pub append: bool,
    /// Values are `KEY=VALUE` entries collected into a map. Implies `append`.
    pub map: bool,
    /// Implicitly recognized by every descendant command.
    pub persistent: bool,
    /// Omitted from generated help.
    pub hidden: bool,
    /// Applied after parsing when the argument is absent.
    pub default_value: Option<String>,
    /// When non-empty, every collected value must be one of these.
    pub choices: Vec<String>,
    /// Fixed number of consecutive tokens one occurrence consumes.
    pub nargs: Option<usize>,
    /// Split each raw value on this character before collection.
    pub delimiter: Option<char>,
    /// Inclusive integer bounds checked after parsing.
    pub range: Option<(i64, i64)>,
    /// Deprecation notice; use emits a warning but parsing proceeds.
    pub deprecated: Option<String>,
    /// Help text shown in generated usage.
    pub help: Option<String>,
    /// Value placeholder shown in generated usage (defaults to NAME).
    pub metavar: Option<String>,
}

impl ArgSpec {
    /// Creates a boolean flag. The long form defaults to the internal name.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::ArgSpec;
    ///
    /// let f = ArgSpec::flag("force");
    /// assert!(f.flag && !f.takes_value());
    /// ```
    pub fn flag(name: &str) -> Self {
        Self {
            name: name.to_string(),
            long: Some(name.to_string()),
            flag: true,
            ..Default::default()
        }
    }

    /// Creates a value-taking option. The long form defaults to the internal
    /// name.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::ArgSpec;
    ///
    /// let o = ArgSpec::option("format").choices(["json", "text"]);
    /// assert!(o.takes_value());
    /// assert_eq!(o.choices, vec!["json", "text"]);
    /// ```
    pub fn option(name: &str) -> Self {
        Self {
            name: name.to_string(),
            long: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// Creates a positional argument, filled from bare tokens in declaration
    /// order.
    pub fn positional(name: &str) -> Self {
        Self {
            name: name.to_string(),
            positional: true,
            ..Default::default()
        }
    }

    /// Sets the short form.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Replaces the long form.
    pub fn long(mut self, long: &str) -> Self {
        self.long = Some(long.to_string());
        self
    }

    /// Adds an alias long form.
    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Marks the argument as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Turns the flag into an occurrence counter (implies `flag`).
    pub fn count(mut self) -> Self {
        self.count = true;
        self.flag = true;
        self
    }

    /// Accepts `--no-<long>` to set the flag false.
    pub fn negatable(mut self) -> Self {
        self.negatable = true;
        self
    }

    /// Accumulates repeated occurrences into an ordered list.
    pub fn append(mut self) -> Self {
        self.append = true;
        self
    }

    /// Consumes exactly `n` tokens per occurrence (implies `append`).
    pub fn nargs(mut self, n: usize) -> Self {
        self.nargs = Some(n);
        if n > 0 {
            self.append = true;
        }
        self
    }

    /// Splits each raw value on `delimiter` before collection (implies
    /// `append`).
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self.append = true;
        self
    }

    /// Collects values as `KEY=VALUE` map entries (implies `append`).
    pub fn key_value(mut self) -> Self {
        self.map = true;
        self.append = true;
        self
    }

    /// Makes the argument visible to every descendant command.
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    /// Hides the argument from generated help.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Sets the default value, applied when the argument is absent.
    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// Restricts collected values to a closed set.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Requires every collected value to parse as an integer in
    /// `min..=max`.
    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Attaches a deprecation notice; use warns but still parses.
    pub fn deprecated(mut self, notice: &str) -> Self {
        self.deprecated = Some(notice.to_string());
        self
    }

    /// Sets the help text.
    pub fn help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Sets the value placeholder used in generated usage.
    pub fn metavar(mut self, metavar: &str) -> Self {
        self.metavar = Some(metavar.to_string());
        self
    }

    /// Whether this argument consumes a value from the token stream when
    /// matched as an option.
    pub fn takes_value(&self) -> bool {
        !self.flag && !self.positional
    }

    /// User-facing name: the long form with dashes, falling back to the
    /// short form, falling back to the internal name.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::ArgSpec;
    ///
    /// assert_eq!(ArgSpec::option("output").display_name(), "--output");
    /// assert_eq!(ArgSpec::positional("pattern").display_name(), "pattern");
    /// ```
    pub fn display_name(&self) -> String {
        if let Some(long) = &self.long {
            if !self.positional {
                return format!("--{long}");
            }
        }
        if let Some(short) = self.short {
            return format!("-{short}");
        }
        self.name.clone()
    }
}

/// A conditional requirement: when `condition` is present after parsing,
/// `target` must be present as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionalRule {
    /// Argument that becomes required.
    pub target: String,
    /// Argument whose presence triggers the requirement.
    pub condition: String,
}

/// A named collection of [`ArgSpec`]s, group constraints, and nested
/// subcommands.
///
/// The tree is built once through the fallible registration methods and is
/// immutable during parsing. Registration conflicts (duplicate names,
/// persistent collisions, mixing positionals with subcommands without the
/// opt-in) surface as [`RegistrationError`] at the registration site.
///
/// # Examples
///
/// ```
/// use argspec_core::{ArgSpec, CommandSpec};
///
/// let spec = CommandSpec::new("app")
///     .with_version("1.2.0")
///     .arg(ArgSpec::flag("verbose").short('v').persistent())?
///     .subcommand(
///         CommandSpec::new("search")
///             .arg(ArgSpec::positional("pattern").required())?,
///     )?;
///
/// assert!(spec.find_subcommand("search").is_some());
/// assert!(spec.find_arg("verbose").is_some());
/// # Ok::<(), argspec_core::RegistrationError>(())
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSpec {
    /// Command name (program name at the root, subcommand name below).
    pub name: String,
    /// Short description shown in generated help.
    pub description: Option<String>,
    /// Version string reported by `--version`.
    pub version: Option<String>,
    /// Arguments in declaration order; positional ones fill in this order.
    pub args: Vec<ArgSpec>,
    /// Nested subcommands.
    pub subcommands: Vec<CommandSpec>,
    /// Groups where at most one member may be present.
    pub mutually_exclusive: Vec<Vec<String>>,
    /// Groups where either zero or all members must be present.
    pub required_together: Vec<Vec<String>>,
    /// Groups where at least one member must be present.
    pub one_required: Vec<Vec<String>>,
    /// Conditional requirements checked after parsing.
    pub conditionals: Vec<ConditionalRule>,
    /// Treat tokens like `-5` or `-1.5e3` as positional values even when
    /// digit short options exist.
    pub allow_negative_numbers: bool,
    /// Opt-in for declaring both positional arguments and subcommands.
    pub allow_subcommand_positionals: bool,
    /// Whether the reserved `help` pseudo-subcommand is active; set
    /// automatically on first subcommand registration.
    pub help_subcommand: bool,
}

impl CommandSpec {
    /// Creates an empty command spec with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Sets the version string.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Allows negative-number tokens to be consumed as positional values
    /// regardless of registered digit short options.
    pub fn allow_negative_numbers(mut self) -> Self {
        self.allow_negative_numbers = true;
        self
    }

    /// Opts in to mixing declared positional arguments with subcommands.
    pub fn allow_subcommand_positionals(mut self) -> Self {
        self.allow_subcommand_positionals = true;
        self
    }

    /// Registers an argument, checking name uniqueness and the
    /// positional/subcommand mixing rule.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError`] when the argument's internal name,
    /// long/alias, or short form collides with an already registered one, or
    /// when it is positional and subcommands exist without the mixing
    /// opt-in.
    pub fn arg(mut self, arg: ArgSpec) -> Result<Self, RegistrationError> {
        validate::check_new_arg(&self, &arg)?;
        self.args.push(arg);
        Ok(self)
    }

    /// Registers a subcommand, checking the persistent-collision and
    /// positional-mixing rules against the child's whole subtree.
    ///
    /// Also activates the reserved `help` pseudo-subcommand, which supports
    /// `app help <sub>` as sugar for `app <sub> --help`.
    pub fn subcommand(mut self, child: CommandSpec) -> Result<Self, RegistrationError> {
        validate::check_new_subcommand(&self, &child)?;
        self.help_subcommand = true;
        self.subcommands.push(child);
        Ok(self)
    }

    /// Declares a mutually-exclusive group over registered argument names.
    pub fn exclusive<I, S>(mut self, members: I) -> Result<Self, RegistrationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = validate::check_group_members(&self, "mutually-exclusive", members)?;
        self.mutually_exclusive.push(members);
        Ok(self)
    }

    /// Declares a required-together group over registered argument names.
    pub fn together<I, S>(mut self, members: I) -> Result<Self, RegistrationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = validate::check_group_members(&self, "required-together", members)?;
        self.required_together.push(members);
        Ok(self)
    }

    /// Declares a one-required group over registered argument names.
    pub fn one_required<I, S>(mut self, members: I) -> Result<Self, RegistrationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let members = validate::check_group_members(&self, "one-required", members)?;
        self.one_required.push(members);
        Ok(self)
    }

    /// Declares a conditional requirement: when `condition` is present after
    /// parsing, `target` must be present too.
    pub fn required_if(mut self, target: &str, condition: &str) -> Result<Self, RegistrationError> {
        validate::check_group_members(&self, "conditional", [target, condition])?;
        self.conditionals.push(ConditionalRule {
            target: target.to_string(),
            condition: condition.to_string(),
        });
        Ok(self)
    }

    /// Finds an argument by internal name.
    pub fn find_arg(&self, name: &str) -> Option<&ArgSpec> {
        self.args.iter().find(|a| a.name == name)
    }

    /// Finds a direct subcommand by exact name.
    ///
    /// # Examples
    ///
    /// ```
    /// use argspec_core::CommandSpec;
    ///
    /// let spec = CommandSpec::new("app")
    ///     .subcommand(CommandSpec::new("search"))?;
    /// assert!(spec.find_subcommand("search").is_some());
    /// assert!(spec.find_subcommand("serach").is_none());
    /// # Ok::<(), argspec_core::RegistrationError>(())
    /// ```
    pub fn find_subcommand(&self, name: &str) -> Option<&CommandSpec> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Positional arguments in declaration order.
    pub fn positional_args(&self) -> impl Iterator<Item = &ArgSpec> {
        self.args.iter().filter(|a| a.positional)
    }

    /// Arguments marked persistent on this command.
    pub fn persistent_args(&self) -> impl Iterator<Item = &ArgSpec> {
        self.args.iter().filter(|a| a.persistent)
    }

    /// Whether any positional arguments are declared.
    pub fn has_positionals(&self) -> bool {
        self.args.iter().any(|a| a.positional)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_implies_flag() {
        let spec = ArgSpec::option("verbose").count();
        assert!(spec.flag);
        assert!(!spec.takes_value());
    }

    #[test]
    fn test_nargs_delimiter_and_map_imply_append() {
        assert!(ArgSpec::option("point").nargs(2).append);
        assert!(ArgSpec::option("include").delimiter(',').append);
        assert!(ArgSpec::option("define").key_value().map);
        assert!(ArgSpec::option("define").key_value().append);
    }

    #[test]
    fn test_display_name_prefers_long() {
        assert_eq!(ArgSpec::flag("verbose").short('v').display_name(), "--verbose");
        let short_only = ArgSpec {
            name: "verbose".to_string(),
            short: Some('v'),
            flag: true,
            ..Default::default()
        };
        assert_eq!(short_only.display_name(), "-v");
    }

    #[test]
    fn test_command_registration_and_lookup() {
        let spec = CommandSpec::new("app")
            .arg(ArgSpec::flag("verbose").short('v'))
            .unwrap()
            .subcommand(CommandSpec::new("run"))
            .unwrap();

        assert!(spec.find_arg("verbose").is_some());
        assert!(spec.find_subcommand("run").is_some());
        assert!(spec.help_subcommand);
    }

    #[test]
    fn test_spec_round_trips_through_json() {
        let spec = CommandSpec::new("app")
            .with_version("0.3.1")
            .arg(ArgSpec::option("format").choices(["json", "text"]))
            .unwrap();

        let raw = serde_json::to_string(&spec).unwrap();
        let back: CommandSpec = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.name, "app");
        assert_eq!(back.find_arg("format").unwrap().choices.len(), 2);
    }

    #[test]
    fn test_terse_json_spec_deserializes_with_defaults() {
        let raw = r#"{
            "name": "tool",
            "args": [
                { "name": "verbose", "long": "verbose", "short": "v", "flag": true },
                { "name": "output", "long": "output" }
            ]
        }"#;
        let spec: CommandSpec = serde_json::from_str(raw).unwrap();
        assert!(spec.find_arg("verbose").unwrap().flag);
        assert!(spec.find_arg("output").unwrap().takes_value());
        assert!(spec.subcommands.is_empty());
    }
}
