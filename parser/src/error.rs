//! Parse-time error taxonomy.
//!
//! Every failure the engine can report is a [`ParseError`] variant.
//! Propagation is fail-fast: the first violation aborts parsing. Help and
//! version requests are *not* errors; they are terminal outcomes (see
//! [`ParseOutcome`](crate::ParseOutcome)).

use thiserror::Error;

fn render_suggestion(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean '{name}'?)"),
        None => String::new(),
    }
}

fn plural(n: &usize) -> &'static str {
    if *n == 1 { "" } else { "s" }
}

/// Errors reported while consuming tokens or validating the result.
///
/// The `Display` impl produces the user-facing message the adapter layer
/// prints to standard error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No registered long or short form matched the token.
    #[error("unknown option '{option}'{}", render_suggestion(.suggestion))]
    UnknownOption {
        option: String,
        suggestion: Option<String>,
    },

    /// An abbreviated long form matched more than one registered name.
    #[error("option '{option}' is ambiguous: matches {}", .candidates.join(", "))]
    AmbiguousOption {
        option: String,
        candidates: Vec<String>,
    },

    /// A value-taking option ran out of tokens (or a fixed-arity option was
    /// given an attached value).
    #[error("option '{option}' requires {expected} value{}", plural(.expected))]
    MissingValue { option: String, expected: usize },

    /// A collected value is outside the declared choice set.
    #[error("invalid value '{value}' for '{option}': expected one of {}", .choices.join(", "))]
    InvalidChoice {
        option: String,
        value: String,
        choices: Vec<String>,
    },

    /// A collected value parses as an integer but violates the declared
    /// inclusive bounds.
    #[error("value '{value}' for '{option}' is out of range {min}..={max}")]
    OutOfRange {
        option: String,
        value: String,
        min: i64,
        max: i64,
    },

    /// A range-checked value does not parse as a base-10 integer.
    #[error("value '{value}' for '{option}' is not an integer")]
    NotAnInteger { option: String, value: String },

    /// A required argument is absent after defaults were applied.
    #[error("missing required argument: {0}")]
    MissingRequiredArgument(String),

    /// More positional values were supplied than declared.
    #[error("too many positional arguments: expected at most {expected}, got {got}")]
    TooManyPositionals { expected: usize, got: usize },

    /// More than one member of a mutually-exclusive group is present.
    #[error("arguments {} cannot be used together", .names.join(", "))]
    MutuallyExclusiveViolation { names: Vec<String> },

    /// A required-together group is only partially present.
    #[error("arguments {} must be used together with {}", .present.join(", "), .missing.join(", "))]
    RequiredTogetherViolation {
        present: Vec<String>,
        missing: Vec<String>,
    },

    /// No member of a one-required group is present.
    #[error("at least one of {} is required", .names.join(", "))]
    OneRequiredViolation { names: Vec<String> },

    /// A conditional pair's condition is present without its target.
    #[error("argument '{target}' is required when '{condition}' is used")]
    ConditionalRequirementViolation { target: String, condition: String },

    /// A bare word matched no registered subcommand.
    #[error("unknown subcommand '{name}'{}", render_suggestion(.suggestion))]
    UnknownSubcommand {
        name: String,
        suggestion: Option<String>,
    },

    /// A map-option value does not contain `=`.
    #[error("invalid value '{value}' for '{option}': expected KEY=VALUE")]
    InvalidKeyValueFormat { option: String, value: String },

    /// A value was attached to an option that takes none.
    #[error("option '{option}' does not take a value")]
    UnexpectedValue { option: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_option_message_includes_suggestion() {
        let err = ParseError::UnknownOption {
            option: "--outptu".to_string(),
            suggestion: Some("output".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "unknown option '--outptu' (did you mean 'output'?)"
        );

        let bare = ParseError::UnknownOption {
            option: "--zzz".to_string(),
            suggestion: None,
        };
        assert_eq!(bare.to_string(), "unknown option '--zzz'");
    }

    #[test]
    fn test_missing_value_message_names_count() {
        let err = ParseError::MissingValue {
            option: "--point".to_string(),
            expected: 2,
        };
        assert_eq!(err.to_string(), "option '--point' requires 2 values");

        let one = ParseError::MissingValue {
            option: "--output".to_string(),
            expected: 1,
        };
        assert_eq!(one.to_string(), "option '--output' requires 1 value");
    }

    #[test]
    fn test_ambiguous_option_lists_candidates() {
        let err = ParseError::AmbiguousOption {
            option: "--ver".to_string(),
            candidates: vec!["--verbose".to_string(), "--version-info".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "option '--ver' is ambiguous: matches --verbose, --version-info"
        );
    }
}
