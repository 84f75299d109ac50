//! Post-parse validation: defaults, then the ordered rule checks.
//!
//! Defaults are applied first, so a defaulted value counts as present for
//! every group rule below. The rules then run in a fixed order and abort
//! on the first violation: required, positional count, mutually-exclusive,
//! required-together, one-required, conditional, numeric range.

use argspec_core::{ArgSpec, CommandSpec};

use crate::collector;
use crate::error::ParseError;
use crate::result::ParseResult;

/// Applies default values for every effective argument that is still
/// absent, local and inherited-persistent alike.
pub(crate) fn apply_defaults(
    command: &CommandSpec,
    inherited: &[&ArgSpec],
    result: &mut ParseResult,
) -> Result<(), ParseError> {
    for spec in inherited.iter().copied().chain(command.args.iter()) {
        if spec.default_value.is_some() && !result.has(&spec.name) {
            collector::collect_default(result, spec)?;
        }
    }
    Ok(())
}

/// Runs the ordered rule checks over this command's own arguments and
/// declared groups.
pub(crate) fn validate(command: &CommandSpec, result: &ParseResult) -> Result<(), ParseError> {
    for spec in &command.args {
        if spec.required && !result.has(&spec.name) {
            return Err(ParseError::MissingRequiredArgument(spec.display_name()));
        }
    }

    let declared = command.positional_args().count();
    let got = result.positionals().len();
    if got > declared {
        return Err(ParseError::TooManyPositionals {
            expected: declared,
            got,
        });
    }

    for group in &command.mutually_exclusive {
        let present: Vec<String> = group
            .iter()
            .filter(|name| result.has(name.as_str()))
            .map(|name| display_name(command, name))
            .collect();
        if present.len() > 1 {
            return Err(ParseError::MutuallyExclusiveViolation { names: present });
        }
    }

    for group in &command.required_together {
        let (present, missing): (Vec<&String>, Vec<&String>) =
            group.iter().partition(|name| result.has(name.as_str()));
        if !present.is_empty() && !missing.is_empty() {
            return Err(ParseError::RequiredTogetherViolation {
                present: present
                    .iter()
                    .map(|name| display_name(command, name.as_str()))
                    .collect(),
                missing: missing
                    .iter()
                    .map(|name| display_name(command, name.as_str()))
                    .collect(),
            });
        }
    }

    for group in &command.one_required {
        if !group.iter().any(|name| result.has(name.as_str())) {
            return Err(ParseError::OneRequiredViolation {
                names: group
                    .iter()
                    .map(|name| display_name(command, name))
                    .collect(),
            });
        }
    }

    for rule in &command.conditionals {
        if result.has(&rule.condition) && !result.has(&rule.target) {
            return Err(ParseError::ConditionalRequirementViolation {
                target: display_name(command, &rule.target),
                condition: display_name(command, &rule.condition),
            });
        }
    }

    for spec in &command.args {
        let Some((min, max)) = spec.range else {
            continue;
        };
        for value in resolved_values(result, spec) {
            let parsed: i64 = value.parse().map_err(|_| ParseError::NotAnInteger {
                option: spec.display_name(),
                value: value.to_string(),
            })?;
            if parsed < min || parsed > max {
                return Err(ParseError::OutOfRange {
                    option: spec.display_name(),
                    value: value.to_string(),
                    min,
                    max,
                });
            }
        }
    }

    Ok(())
}

/// Every resolved value for one argument: each list element for
/// list-valued arguments, otherwise the single stored value.
fn resolved_values<'r>(result: &'r ParseResult, spec: &ArgSpec) -> Vec<&'r str> {
    let list = result.get_list(&spec.name);
    if !list.is_empty() {
        return list.iter().map(String::as_str).collect();
    }
    result.get_string(&spec.name).into_iter().collect()
}

fn display_name(command: &CommandSpec, name: &str) -> String {
    command
        .find_arg(name)
        .map(ArgSpec::display_name)
        .unwrap_or_else(|| name.to_string())
}
