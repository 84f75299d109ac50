//! Value collection: turning raw tokens into typed result entries.
//!
//! One occurrence of an option hands its raw value(s) here. The collector
//! applies delimiter splitting and key-value parsing, choice-validates
//! every piece, and stores it in the right result stores. Scalar values
//! always land in the last-wins string store as well, so `get_string`
//! works uniformly for plain, append, and map options.

use argspec_core::ArgSpec;

use crate::error::ParseError;
use crate::result::ParseResult;

/// Collects one raw occurrence value for a value-taking argument.
pub(crate) fn collect_value(
    result: &mut ParseResult,
    spec: &ArgSpec,
    raw: &str,
) -> Result<(), ParseError> {
    if let Some(delimiter) = spec.delimiter {
        // Empty fragments are discarded, so "a,b," yields exactly two
        // elements.
        for fragment in raw.split(delimiter).filter(|f| !f.is_empty()) {
            collect_one(result, spec, fragment)?;
        }
        return Ok(());
    }
    collect_one(result, spec, raw)
}

fn collect_one(result: &mut ParseResult, spec: &ArgSpec, value: &str) -> Result<(), ParseError> {
    check_choice(spec, value)?;

    if spec.map {
        let Some((key, entry)) = value.split_once('=') else {
            return Err(ParseError::InvalidKeyValueFormat {
                option: spec.display_name(),
                value: value.to_string(),
            });
        };
        result.insert_map(&spec.name, key, entry);
        result.push_list(&spec.name, value);
        result.set_value(&spec.name, value);
        return Ok(());
    }

    if spec.append {
        result.push_list(&spec.name, value);
    }
    result.set_value(&spec.name, value);
    Ok(())
}

/// Applies the default value through the normal collection path, so
/// delimiter splitting, map parsing, and choice validation all apply to
/// defaults too. Flags have no defaults; absence already reads as false.
pub(crate) fn collect_default(result: &mut ParseResult, spec: &ArgSpec) -> Result<(), ParseError> {
    if spec.flag {
        return Ok(());
    }
    let Some(default) = spec.default_value.clone() else {
        return Ok(());
    };
    collect_value(result, spec, &default)
}

/// Rejects values outside a declared choice set, wherever they came from.
pub(crate) fn check_choice(spec: &ArgSpec, value: &str) -> Result<(), ParseError> {
    if spec.choices.is_empty() || spec.choices.iter().any(|c| c == value) {
        return Ok(());
    }
    Err(ParseError::InvalidChoice {
        option: spec.display_name(),
        value: value.to_string(),
        choices: spec.choices.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_value_last_occurrence_wins() {
        let spec = ArgSpec::option("output");
        let mut result = ParseResult::default();
        collect_value(&mut result, &spec, "a.txt").unwrap();
        collect_value(&mut result, &spec, "b.txt").unwrap();
        assert_eq!(result.get_string("output"), Some("b.txt"));
        assert!(result.get_list("output").is_empty());
    }

    #[test]
    fn test_append_accumulates() {
        let spec = ArgSpec::option("include").append();
        let mut result = ParseResult::default();
        collect_value(&mut result, &spec, "a").unwrap();
        collect_value(&mut result, &spec, "b").unwrap();
        assert_eq!(result.get_list("include"), ["a", "b"]);
        assert_eq!(result.get_string("include"), Some("b"));
    }

    #[test]
    fn test_delimiter_discards_empty_fragments() {
        let spec = ArgSpec::option("include").delimiter(',');
        let mut result = ParseResult::default();
        collect_value(&mut result, &spec, "a,b,").unwrap();
        assert_eq!(result.get_list("include"), ["a", "b"]);
    }

    #[test]
    fn test_map_splits_on_first_equals_only() {
        let spec = ArgSpec::option("define").key_value();
        let mut result = ParseResult::default();
        collect_value(&mut result, &spec, "CFLAGS=-O2=fast").unwrap();
        assert_eq!(
            result.get_map("define").get("CFLAGS").map(String::as_str),
            Some("-O2=fast")
        );
    }

    #[test]
    fn test_map_without_equals_is_fatal() {
        let spec = ArgSpec::option("define").key_value();
        let mut result = ParseResult::default();
        let err = collect_value(&mut result, &spec, "CC").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidKeyValueFormat {
                option: "--define".to_string(),
                value: "CC".to_string(),
            }
        );
    }

    #[test]
    fn test_choice_applies_to_delimiter_fragments() {
        let spec = ArgSpec::option("format")
            .delimiter(',')
            .choices(["json", "text"]);
        let mut result = ParseResult::default();
        let err = collect_value(&mut result, &spec, "json,xml").unwrap_err();
        assert!(matches!(err, ParseError::InvalidChoice { value, .. } if value == "xml"));
    }

    #[test]
    fn test_default_runs_through_collection() {
        let spec = ArgSpec::option("include").delimiter(',').default_value("a,b");
        let mut result = ParseResult::default();
        collect_default(&mut result, &spec).unwrap();
        assert_eq!(result.get_list("include"), ["a", "b"]);
    }
}
