//! Typed, queryable parse output.
//!
//! A [`ParseResult`] is created fresh for each parse call, mutated only
//! while the engine runs, and returned read-only to the caller. Dispatching
//! a subcommand nests the child's result inside the parent's.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

static EMPTY_MAP: LazyLock<HashMap<String, String>> = LazyLock::new(HashMap::new);

/// The typed outcome of parsing one command's tokens.
///
/// Absence is never an error at the accessor level: flags read as `false`,
/// counts as `0`, lists and maps as empty, and string/integer lookups as
/// `None`.
///
/// # Examples
///
/// ```
/// use argspec_core::{ArgSpec, CommandSpec};
/// use argspec_parser::{ParseOutcome, parse};
///
/// let spec = CommandSpec::new("app")
///     .arg(ArgSpec::flag("verbose").short('v').count()).unwrap()
///     .arg(ArgSpec::option("output").short('o')).unwrap();
///
/// let argv: Vec<String> = ["app", "-vv", "-o", "out.txt"]
///     .iter().map(ToString::to_string).collect();
/// let ParseOutcome::Matches(result) = parse(&spec, &argv).unwrap() else {
///     unreachable!();
/// };
///
/// assert_eq!(result.get_count("verbose"), 2);
/// assert_eq!(result.get_string("output"), Some("out.txt"));
/// assert!(!result.get_flag("missing"));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseResult {
    flags: HashMap<String, bool>,
    values: HashMap<String, String>,
    lists: HashMap<String, Vec<String>>,
    maps: HashMap<String, HashMap<String, String>>,
    counts: HashMap<String, u64>,
    positionals: Vec<String>,
    subcommand: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    subcommand_result: Option<Box<ParseResult>>,
    warnings: Vec<String>,
}

impl ParseResult {
    /// Flag state; `false` when the flag never appeared.
    pub fn get_flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Last string value collected for `name` (options and named
    /// positionals alike); `None` when absent.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Last value parsed as a base-10 integer; `None` when absent or not an
    /// integer.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(|v| v.parse().ok())
    }

    /// Occurrence count for a count option; `0` when it never appeared.
    pub fn get_count(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Accumulated ordered values (append, nargs, delimiter); empty when
    /// absent.
    pub fn get_list(&self, name: &str) -> &[String] {
        self.lists.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Key-value entries collected for a map option; empty when absent.
    pub fn get_map(&self, name: &str) -> &HashMap<String, String> {
        self.maps.get(name).unwrap_or(&EMPTY_MAP)
    }

    /// Whether any store holds an entry for `name`. Defaulted values count
    /// as present.
    pub fn has(&self, name: &str) -> bool {
        self.flags.contains_key(name)
            || self.values.contains_key(name)
            || self.lists.contains_key(name)
            || self.maps.contains_key(name)
            || self.counts.contains_key(name)
    }

    /// Positional values in the order they were consumed.
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Name of the dispatched subcommand; empty when none was dispatched.
    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    /// The nested result of the dispatched subcommand, if any.
    pub fn subcommand_result(&self) -> Option<&ParseResult> {
        self.subcommand_result.as_deref()
    }

    /// Non-fatal notices (deprecated options) collected while parsing this
    /// command's own tokens.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl ParseResult {
    pub(crate) fn set_flag(&mut self, name: &str, value: bool) {
        self.flags.insert(name.to_string(), value);
    }

    pub(crate) fn set_value(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub(crate) fn push_list(&mut self, name: &str, value: &str) {
        self.lists
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
    }

    pub(crate) fn insert_map(&mut self, name: &str, key: &str, value: &str) {
        self.maps
            .entry(name.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub(crate) fn bump_count(&mut self, name: &str) {
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn push_positional(&mut self, value: &str) {
        self.positionals.push(value.to_string());
    }

    pub(crate) fn set_subcommand(&mut self, name: &str, child: ParseResult) {
        self.subcommand = name.to_string();
        self.subcommand_result = Some(Box::new(child));
    }

    pub(crate) fn push_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Copies every store entry for `name` out of `other`, overwriting any
    /// entry already held. Used for persistent-argument push-down and
    /// bubble-up.
    pub(crate) fn copy_entry_from(&mut self, other: &ParseResult, name: &str) {
        if let Some(value) = other.flags.get(name) {
            self.flags.insert(name.to_string(), *value);
        }
        if let Some(value) = other.values.get(name) {
            self.values.insert(name.to_string(), value.clone());
        }
        if let Some(value) = other.lists.get(name) {
            self.lists.insert(name.to_string(), value.clone());
        }
        if let Some(value) = other.maps.get(name) {
            self.maps.insert(name.to_string(), value.clone());
        }
        if let Some(value) = other.counts.get(name) {
            self.counts.insert(name.to_string(), *value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_entries_read_as_empty() {
        let result = ParseResult::default();
        assert!(!result.get_flag("verbose"));
        assert_eq!(result.get_count("verbose"), 0);
        assert_eq!(result.get_string("output"), None);
        assert_eq!(result.get_int("jobs"), None);
        assert!(result.get_list("include").is_empty());
        assert!(result.get_map("define").is_empty());
        assert!(!result.has("anything"));
        assert_eq!(result.subcommand(), "");
        assert!(result.subcommand_result().is_none());
    }

    #[test]
    fn test_has_sees_every_store() {
        let mut result = ParseResult::default();
        result.set_flag("a", false);
        result.bump_count("b");
        result.push_list("c", "x");
        result.insert_map("d", "k", "v");
        result.set_value("e", "y");

        for name in ["a", "b", "c", "d", "e"] {
            assert!(result.has(name), "expected '{name}' to be present");
        }
    }

    #[test]
    fn test_copy_entry_from_overwrites() {
        let mut parent = ParseResult::default();
        parent.set_flag("verbose", false);

        let mut child = ParseResult::default();
        child.set_flag("verbose", true);
        child.bump_count("level");

        parent.copy_entry_from(&child, "verbose");
        parent.copy_entry_from(&child, "level");
        assert!(parent.get_flag("verbose"));
        assert_eq!(parent.get_count("level"), 1);
    }

    #[test]
    fn test_result_tree_serializes_to_json() {
        let mut child = ParseResult::default();
        child.set_value("pattern", "hi");

        let mut result = ParseResult::default();
        result.set_flag("verbose", true);
        result.set_subcommand("search", child);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["flags"]["verbose"], true);
        assert_eq!(value["subcommand"], "search");
        assert_eq!(value["subcommand_result"]["values"]["pattern"], "hi");
    }

    #[test]
    fn test_get_int_parses_signed_values() {
        let mut result = ParseResult::default();
        result.set_value("offset", "-12");
        assert_eq!(result.get_int("offset"), Some(-12));
        result.set_value("offset", "+7");
        assert_eq!(result.get_int("offset"), Some(7));
        result.set_value("offset", "1.5");
        assert_eq!(result.get_int("offset"), None);
    }
}
