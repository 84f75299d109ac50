//! The token-consumption state machine and subcommand router.
//!
//! One [`Session`] walks one command's token list. Tokens are classified
//! in `Normal` state until the literal `--` switches the rest of the list
//! to positional-only consumption, or a subcommand match hands everything
//! after it to a recursive child session. Reserved help/version tokens
//! short-circuit to terminal outcomes at any point in `Normal` state.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use argspec_core::{ArgSpec, CommandSpec};

use crate::collector;
use crate::constraints;
use crate::error::ParseError;
use crate::help;
use crate::resolver::Resolver;
use crate::result::ParseResult;
use crate::suggest;

/// Terminal outcome of one parse call.
///
/// Help and version requests are modeled as outcomes rather than errors or
/// process exits, so embedding code and tests can intercept them. The
/// decision to print and terminate belongs to the adapter layer.
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    /// Token consumption and validation completed.
    Matches(ParseResult),
    /// A help request short-circuited parsing; carries rendered help text.
    Help(String),
    /// A version request short-circuited parsing; carries the version line.
    Version(String),
}

/// Reserved pseudo-subcommand: `app help <sub>` is sugar for
/// `app <sub> --help`. Excluded from suggestions and listings.
const HELP_SUBCOMMAND: &str = "help";

/// `-` followed by digits or `.digits`, an optional `.digits` fraction,
/// and an optional exponent.
static NEGATIVE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-(?:\d+|\.\d+)(?:\.\d+)?(?:[eE][+-]?\d+)?$")
        .expect("static regex must compile")
});

enum Route<'s> {
    Dispatch(&'s CommandSpec),
    HelpSugar,
    Positional,
}

pub(crate) struct Session<'s> {
    command: &'s CommandSpec,
    /// Persistent arguments inherited from ancestors, outermost first.
    inherited: Vec<&'s ArgSpec>,
    resolver: Resolver<'s>,
    /// Qualified name, e.g. "app search".
    path: String,
    result: ParseResult,
}

impl<'s> Session<'s> {
    pub(crate) fn new(
        command: &'s CommandSpec,
        inherited: Vec<&'s ArgSpec>,
        path: String,
    ) -> Self {
        let resolver = Resolver::new(&inherited, &command.args);
        Self {
            command,
            inherited,
            resolver,
            path,
            result: ParseResult::default(),
        }
    }

    /// Seeds the result with the parent's entries for every inherited
    /// persistent argument (push-down of values given before the
    /// subcommand token).
    pub(crate) fn seed_persistent(&mut self, parent: &ParseResult) {
        for index in 0..self.inherited.len() {
            let name = self.inherited[index].name.clone();
            self.result.copy_entry_from(parent, &name);
        }
    }

    /// Consumes the whole token list. `argv[0]` is the program-name
    /// placeholder and is skipped.
    pub(crate) fn run(mut self, argv: &[String]) -> Result<ParseOutcome, ParseError> {
        let mut positional_only = false;
        let mut i = 1;

        while i < argv.len() {
            let token = argv[i].as_str();

            if positional_only {
                self.take_positional(token)?;
                i += 1;
                continue;
            }
            if token == "--" {
                debug!(command = %self.path, "entering positional-only mode");
                positional_only = true;
                i += 1;
                continue;
            }
            if matches!(token, "--help" | "-h" | "-?") {
                return Ok(ParseOutcome::Help(self.render_own_help()));
            }
            if matches!(token, "--version" | "-V") {
                return Ok(ParseOutcome::Version(help::version(self.command)));
            }
            if let Some(body) = token.strip_prefix("--") {
                i = self.handle_long(body, argv, i)?;
                continue;
            }
            if token.len() > 1 && token.starts_with('-') {
                if self.negative_number_positional(token) {
                    self.take_positional(token)?;
                    i += 1;
                } else {
                    i = self.handle_short(token, argv, i)?;
                }
                continue;
            }

            if !self.command.subcommands.is_empty() || self.command.help_subcommand {
                match self.route_bare_word(token)? {
                    Route::Dispatch(child) => return self.dispatch(child, argv, i),
                    Route::HelpSugar => return self.help_sugar(argv, i),
                    Route::Positional => {}
                }
            }
            self.take_positional(token)?;
            i += 1;
        }

        self.finish()
    }

    fn finish(mut self) -> Result<ParseOutcome, ParseError> {
        constraints::apply_defaults(self.command, &self.inherited, &mut self.result)?;
        constraints::validate(self.command, &self.result)?;
        Ok(ParseOutcome::Matches(self.result))
    }

    fn render_own_help(&self) -> String {
        help::render(self.command, &self.path, &self.inherited)
    }

    // ---- long options ----

    fn handle_long(&mut self, body: &str, argv: &[String], i: usize) -> Result<usize, ParseError> {
        let (key, attached) = match body.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (body, None),
        };

        match self.resolver.resolve_long(key) {
            Ok(spec) => {
                self.note_deprecated(spec);
                self.dispatch_option(spec, &format!("--{key}"), attached, argv, i)
            }
            Err(ambiguous @ ParseError::AmbiguousOption { .. }) => Err(ambiguous),
            Err(unknown) => {
                if let Some(stripped) = key.strip_prefix("no-") {
                    if let Some(spec) = self.resolver.resolve_negated(stripped)? {
                        if attached.is_some() {
                            return Err(ParseError::UnexpectedValue {
                                option: format!("--{key}"),
                            });
                        }
                        self.note_deprecated(spec);
                        self.result.set_flag(&spec.name, false);
                        return Ok(i + 1);
                    }
                }
                Err(unknown)
            }
        }
    }

    /// Consumes one resolved option occurrence and returns the index of
    /// the next unconsumed token.
    fn dispatch_option(
        &mut self,
        spec: &'s ArgSpec,
        display: &str,
        attached: Option<&str>,
        argv: &[String],
        i: usize,
    ) -> Result<usize, ParseError> {
        if spec.count {
            if attached.is_some() {
                return Err(ParseError::UnexpectedValue {
                    option: display.to_string(),
                });
            }
            self.result.bump_count(&spec.name);
            return Ok(i + 1);
        }
        if spec.flag {
            if attached.is_some() {
                return Err(ParseError::UnexpectedValue {
                    option: display.to_string(),
                });
            }
            self.result.set_flag(&spec.name, true);
            return Ok(i + 1);
        }

        let nargs = spec.nargs.unwrap_or(1);
        if nargs >= 2 {
            // Fixed-arity options consume separate tokens; attached forms
            // are rejected outright.
            if attached.is_some() {
                return Err(ParseError::MissingValue {
                    option: display.to_string(),
                    expected: nargs,
                });
            }
            for offset in 0..nargs {
                let Some(value) = argv.get(i + 1 + offset) else {
                    return Err(ParseError::MissingValue {
                        option: display.to_string(),
                        expected: nargs,
                    });
                };
                collector::collect_value(&mut self.result, spec, value)?;
            }
            return Ok(i + 1 + nargs);
        }

        if let Some(value) = attached {
            collector::collect_value(&mut self.result, spec, value)?;
            return Ok(i + 1);
        }
        let Some(value) = argv.get(i + 1) else {
            return Err(ParseError::MissingValue {
                option: display.to_string(),
                expected: 1,
            });
        };
        collector::collect_value(&mut self.result, spec, value)?;
        Ok(i + 2)
    }

    // ---- short options ----

    /// Walks a `-abc` token: flags and counts are consumed one character
    /// at a time until a value-consuming option takes the rest of the
    /// token as its attached value (or, when nothing remains, the next
    /// token).
    fn handle_short(&mut self, token: &str, argv: &[String], i: usize) -> Result<usize, ParseError> {
        let body = &token[1..];

        for (pos, ch) in body.char_indices() {
            let Some(spec) = self.resolver.resolve_short(ch) else {
                return Err(ParseError::UnknownOption {
                    option: format!("-{ch}"),
                    suggestion: None,
                });
            };
            self.note_deprecated(spec);

            if spec.count {
                self.result.bump_count(&spec.name);
                continue;
            }
            if spec.flag {
                self.result.set_flag(&spec.name, true);
                continue;
            }

            let display = format!("-{ch}");
            let rest = &body[pos + ch.len_utf8()..];
            let nargs = spec.nargs.unwrap_or(1);
            if nargs >= 2 {
                if !rest.is_empty() {
                    return Err(ParseError::MissingValue {
                        option: display,
                        expected: nargs,
                    });
                }
                for offset in 0..nargs {
                    let Some(value) = argv.get(i + 1 + offset) else {
                        return Err(ParseError::MissingValue {
                            option: display,
                            expected: nargs,
                        });
                    };
                    collector::collect_value(&mut self.result, spec, value)?;
                }
                return Ok(i + 1 + nargs);
            }
            if !rest.is_empty() {
                collector::collect_value(&mut self.result, spec, rest)?;
                return Ok(i + 1);
            }
            let Some(value) = argv.get(i + 1) else {
                return Err(ParseError::MissingValue {
                    option: display,
                    expected: 1,
                });
            };
            collector::collect_value(&mut self.result, spec, value)?;
            return Ok(i + 2);
        }

        Ok(i + 1)
    }

    fn negative_number_positional(&self, token: &str) -> bool {
        NEGATIVE_NUMBER.is_match(token)
            && (self.command.allow_negative_numbers || !self.resolver.has_digit_short())
    }

    // ---- bare words, subcommands ----

    fn route_bare_word(&self, token: &str) -> Result<Route<'s>, ParseError> {
        let command = self.command;
        if let Some(child) = command.find_subcommand(token) {
            return Ok(Route::Dispatch(child));
        }
        if token == HELP_SUBCOMMAND && command.help_subcommand {
            return Ok(Route::HelpSugar);
        }
        if !command.has_positionals() {
            return Err(ParseError::UnknownSubcommand {
                name: token.to_string(),
                suggestion: suggest::closest(
                    token,
                    command.subcommands.iter().map(|s| s.name.as_str()),
                ),
            });
        }
        Ok(Route::Positional)
    }

    /// Recursively parses the remaining tokens against `child`, then
    /// synchronizes persistent entries both ways and finishes this
    /// command.
    fn dispatch(
        mut self,
        child: &'s CommandSpec,
        argv: &[String],
        i: usize,
    ) -> Result<ParseOutcome, ParseError> {
        let qualified = format!("{} {}", self.path, child.name);
        debug!(parent = %self.path, subcommand = %child.name, "dispatching subcommand");

        let mut child_argv: Vec<String> = Vec::with_capacity(argv.len() - i);
        child_argv.push(qualified.clone());
        child_argv.extend_from_slice(&argv[i + 1..]);

        let mut child_inherited = self.inherited.clone();
        child_inherited.extend(self.command.persistent_args());
        let persistent_names: Vec<String> =
            child_inherited.iter().map(|s| s.name.clone()).collect();

        let mut session = Session::new(child, child_inherited, qualified);
        session.seed_persistent(&self.result);

        match session.run(&child_argv)? {
            ParseOutcome::Matches(child_result) => {
                for name in &persistent_names {
                    self.result.copy_entry_from(&child_result, name);
                }
                self.result.set_subcommand(&child.name, child_result);
                self.finish()
            }
            terminal => Ok(terminal),
        }
    }

    /// `app help [sub]`: renders this command's help, or the named child's,
    /// as if `--help` had been passed to it.
    fn help_sugar(self, argv: &[String], i: usize) -> Result<ParseOutcome, ParseError> {
        let command = self.command;
        match argv.get(i + 1) {
            None => Ok(ParseOutcome::Help(self.render_own_help())),
            Some(name) => {
                let Some(child) = command.find_subcommand(name) else {
                    return Err(ParseError::UnknownSubcommand {
                        name: name.clone(),
                        suggestion: suggest::closest(
                            name,
                            command.subcommands.iter().map(|s| s.name.as_str()),
                        ),
                    });
                };
                let qualified = format!("{} {}", self.path, child.name);
                let mut child_inherited = self.inherited.clone();
                child_inherited.extend(command.persistent_args());
                Ok(ParseOutcome::Help(help::render(
                    child,
                    &qualified,
                    &child_inherited,
                )))
            }
        }
    }

    // ---- positionals, warnings ----

    fn take_positional(&mut self, token: &str) -> Result<(), ParseError> {
        let command = self.command;
        let index = self.result.positionals().len();
        if let Some(spec) = command.positional_args().nth(index) {
            collector::check_choice(spec, token)?;
            self.note_deprecated(spec);
            self.result.set_value(&spec.name, token);
        }
        self.result.push_positional(token);
        Ok(())
    }

    fn note_deprecated(&mut self, spec: &ArgSpec) {
        if let Some(notice) = &spec.deprecated {
            let message = format!("{} is deprecated: {notice}", spec.display_name());
            warn!(command = %self.path, "{message}");
            self.result.push_warning(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_number_pattern() {
        for token in ["-5", "-12", "-.5", "-1.5", "-1.5e3", "-2E-7", "-.5e+2"] {
            assert!(NEGATIVE_NUMBER.is_match(token), "expected match: {token}");
        }
        for token in ["-", "-x", "-1x", "--5", "-e5", "-5e", "5"] {
            assert!(!NEGATIVE_NUMBER.is_match(token), "expected no match: {token}");
        }
    }
}
