//! Option-name resolution: exact, alias, and unambiguous-prefix matching.
//!
//! Long names resolve in a fixed order: exact primary match, exact alias
//! match, then prefix matching over both. A prefix that matches more than
//! one registered name is ambiguous; one that matches none is unknown and
//! carries a typo suggestion. Short names resolve by exact single-character
//! match only.

use argspec_core::ArgSpec;

use crate::error::ParseError;
use crate::suggest;

pub(crate) struct Resolver<'s> {
    /// Effective named specs in registration order: inherited persistent
    /// arguments first, then local ones.
    specs: Vec<&'s ArgSpec>,
}

impl<'s> Resolver<'s> {
    pub(crate) fn new(inherited: &[&'s ArgSpec], local: &'s [ArgSpec]) -> Self {
        let mut specs: Vec<&'s ArgSpec> = inherited.to_vec();
        specs.extend(local.iter().filter(|a| !a.positional));
        Self { specs }
    }

    /// Resolves a long-form key (without the leading dashes).
    pub(crate) fn resolve_long(&self, key: &str) -> Result<&'s ArgSpec, ParseError> {
        if key.is_empty() {
            return Err(self.unknown(key));
        }

        if let Some(spec) = self
            .specs
            .iter()
            .copied()
            .find(|s| s.long.as_deref() == Some(key))
        {
            return Ok(spec);
        }
        if let Some(spec) = self
            .specs
            .iter()
            .copied()
            .find(|s| s.aliases.iter().any(|a| a == key))
        {
            return Ok(spec);
        }

        let mut candidates: Vec<(&'s str, &'s ArgSpec)> = Vec::new();
        for spec in self.specs.iter().copied() {
            if let Some(long) = spec.long.as_deref() {
                if long.starts_with(key) {
                    candidates.push((long, spec));
                }
            }
            for alias in &spec.aliases {
                if alias.starts_with(key) {
                    candidates.push((alias.as_str(), spec));
                }
            }
        }

        match candidates.as_slice() {
            [(_, spec)] => Ok(*spec),
            [] => Err(self.unknown(key)),
            _ => Err(ParseError::AmbiguousOption {
                option: format!("--{key}"),
                candidates: candidates
                    .iter()
                    .map(|(name, _)| format!("--{name}"))
                    .collect(),
            }),
        }
    }

    /// Resolves a `--no-` stripped key among negatable specs, with the same
    /// exact-then-prefix order. `Ok(None)` means nothing negatable matched.
    pub(crate) fn resolve_negated(&self, key: &str) -> Result<Option<&'s ArgSpec>, ParseError> {
        if key.is_empty() {
            return Ok(None);
        }
        let negatable: Vec<&'s ArgSpec> = self
            .specs
            .iter()
            .copied()
            .filter(|s| s.negatable)
            .collect();

        if let Some(spec) = negatable
            .iter()
            .copied()
            .find(|s| s.long.as_deref() == Some(key))
        {
            return Ok(Some(spec));
        }
        if let Some(spec) = negatable
            .iter()
            .copied()
            .find(|s| s.aliases.iter().any(|a| a == key))
        {
            return Ok(Some(spec));
        }

        let mut candidates: Vec<(&'s str, &'s ArgSpec)> = Vec::new();
        for spec in negatable.iter().copied() {
            if let Some(long) = spec.long.as_deref() {
                if long.starts_with(key) {
                    candidates.push((long, spec));
                }
            }
            for alias in &spec.aliases {
                if alias.starts_with(key) {
                    candidates.push((alias.as_str(), spec));
                }
            }
        }

        match candidates.as_slice() {
            [(_, spec)] => Ok(Some(*spec)),
            [] => Ok(None),
            _ => Err(ParseError::AmbiguousOption {
                option: format!("--no-{key}"),
                candidates: candidates
                    .iter()
                    .map(|(name, _)| format!("--no-{name}"))
                    .collect(),
            }),
        }
    }

    /// Exact single-character short lookup.
    pub(crate) fn resolve_short(&self, short: char) -> Option<&'s ArgSpec> {
        self.specs
            .iter()
            .find(|s| s.short == Some(short))
            .copied()
    }

    /// Whether any registered short form is a digit, which disables the
    /// negative-number heuristic unless the spec opts back in.
    pub(crate) fn has_digit_short(&self) -> bool {
        self.specs
            .iter()
            .any(|s| s.short.is_some_and(|c| c.is_ascii_digit()))
    }

    fn unknown(&self, key: &str) -> ParseError {
        let names = self.specs.iter().flat_map(|s| {
            s.long
                .as_deref()
                .into_iter()
                .chain(s.aliases.iter().map(String::as_str))
        });
        ParseError::UnknownOption {
            option: format!("--{key}"),
            suggestion: suggest::closest(key, names),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<ArgSpec> {
        vec![
            ArgSpec::flag("verbose").short('v'),
            ArgSpec::option("version-info"),
            ArgSpec::option("output").short('o').alias("out-file"),
            ArgSpec::flag("color").negatable(),
        ]
    }

    #[test]
    fn test_exact_match_beats_prefix() {
        let specs = specs();
        let resolver = Resolver::new(&[], &specs);
        // "verbose" is also a prefix of nothing else; exact must win even
        // though "version-info" shares the "ver" stem.
        assert_eq!(resolver.resolve_long("verbose").unwrap().name, "verbose");
    }

    #[test]
    fn test_unambiguous_prefix_resolves() {
        let specs = specs();
        let resolver = Resolver::new(&[], &specs);
        assert_eq!(resolver.resolve_long("col").unwrap().name, "color");
        assert_eq!(resolver.resolve_long("outp").unwrap().name, "output");
    }

    #[test]
    fn test_alias_participates_in_exact_and_prefix_matching() {
        let specs = specs();
        let resolver = Resolver::new(&[], &specs);
        assert_eq!(resolver.resolve_long("out-file").unwrap().name, "output");
        assert_eq!(resolver.resolve_long("out-f").unwrap().name, "output");
    }

    #[test]
    fn test_ambiguous_prefix_lists_all_candidates() {
        let specs = specs();
        let resolver = Resolver::new(&[], &specs);
        let err = resolver.resolve_long("ver").unwrap_err();
        assert_eq!(
            err,
            ParseError::AmbiguousOption {
                option: "--ver".to_string(),
                candidates: vec!["--verbose".to_string(), "--version-info".to_string()],
            }
        );
    }

    #[test]
    fn test_prefix_spanning_long_and_alias_of_one_arg_is_ambiguous() {
        let specs = vec![ArgSpec::option("output").alias("outcome")];
        let resolver = Resolver::new(&[], &specs);
        let err = resolver.resolve_long("out").unwrap_err();
        assert!(matches!(err, ParseError::AmbiguousOption { .. }));
    }

    #[test]
    fn test_unknown_option_carries_suggestion() {
        let specs = specs();
        let resolver = Resolver::new(&[], &specs);
        let err = resolver.resolve_long("outptu").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownOption {
                option: "--outptu".to_string(),
                suggestion: Some("output".to_string()),
            }
        );
    }

    #[test]
    fn test_negation_restricted_to_negatable() {
        let specs = specs();
        let resolver = Resolver::new(&[], &specs);
        assert_eq!(
            resolver.resolve_negated("color").unwrap().unwrap().name,
            "color"
        );
        // "verbose" exists but is not negatable.
        assert!(resolver.resolve_negated("verbose").unwrap().is_none());
    }

    #[test]
    fn test_short_resolution_is_exact_only() {
        let specs = specs();
        let resolver = Resolver::new(&[], &specs);
        assert_eq!(resolver.resolve_short('o').unwrap().name, "output");
        assert!(resolver.resolve_short('x').is_none());
    }
}
