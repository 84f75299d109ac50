//! Registration-time validation of command trees.
//!
//! Every conflict the builder methods on [`CommandSpec`] can detect is
//! reported through [`RegistrationError`], at the moment an argument, a
//! subcommand, or a group rule is registered. [`validate_command`] re-runs
//! the same checks over a finished tree, which matters for trees built by
//! deserialization rather than through the builders.
//!
//! # Examples
//!
//! ```
//! use argspec_core::{ArgSpec, CommandSpec, RegistrationError, validate_command};
//!
//! let spec = CommandSpec::new("app")
//!     .arg(ArgSpec::flag("verbose").short('v'))?;
//! assert!(validate_command(&spec).is_ok());
//!
//! // Duplicate short form is rejected at the registration site.
//! let err = spec.arg(ArgSpec::flag("version-info").short('v')).unwrap_err();
//! assert!(matches!(err, RegistrationError::DuplicateSurface { .. }));
//! # Ok::<(), argspec_core::RegistrationError>(())
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ArgSpec, CommandSpec};

/// Conflicts detected while building a [`CommandSpec`] tree.
///
/// These are raised during registration, never during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Argument internal name is empty.
    #[error("argument name cannot be empty")]
    EmptyArgName,
    /// Command or subcommand name is empty.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Two arguments in the same command share an internal name.
    #[error("duplicate argument name: {0}")]
    DuplicateArgName(String),
    /// A long, alias, or short form is already taken in this command.
    #[error("argument '{arg}' reuses option name '{surface}'")]
    DuplicateSurface { arg: String, surface: String },
    /// A long/alias contains `=`, whitespace, or a leading dash, or a short
    /// form is itself a dash.
    #[error("argument '{arg}' has invalid option name '{surface}'")]
    InvalidSurface { arg: String, surface: String },
    /// Positional arguments and subcommands declared together without the
    /// explicit opt-in.
    #[error("command '{0}' mixes positional arguments and subcommands without opt-in")]
    MixedPositionals(String),
    /// Two subcommands in the same command share a name.
    #[error("duplicate subcommand: {0}")]
    DuplicateSubcommand(String),
    /// A persistent ancestor argument collides with an argument declared
    /// somewhere in a newly attached subtree.
    #[error(
        "persistent argument '{persistent}' collides with '{surface}' on subcommand '{command}'"
    )]
    PersistentConflict {
        persistent: String,
        command: String,
        surface: String,
    },
    /// A group rule references an argument that is not registered.
    #[error("{rule} rule references unknown argument '{name}'")]
    UnknownGroupMember { rule: String, name: String },
    /// Positional arguments cannot be persistent.
    #[error("positional argument '{0}' cannot be persistent")]
    PersistentPositional(String),
}

/// Long forms of an argument: the primary long name plus all aliases.
fn long_surfaces(arg: &ArgSpec) -> impl Iterator<Item = &str> {
    arg.long
        .as_deref()
        .into_iter()
        .chain(arg.aliases.iter().map(String::as_str))
}

fn valid_long(surface: &str) -> bool {
    !surface.is_empty()
        && !surface.starts_with('-')
        && !surface.contains('=')
        && !surface.chars().any(char::is_whitespace)
}

/// First colliding surface between two arguments, rendered with dashes.
fn surface_collision(a: &ArgSpec, b: &ArgSpec) -> Option<String> {
    for la in long_surfaces(a) {
        if long_surfaces(b).any(|lb| lb == la) {
            return Some(format!("--{la}"));
        }
    }
    match (a.short, b.short) {
        (Some(sa), Some(sb)) if sa == sb => Some(format!("-{sa}")),
        _ => None,
    }
}

pub(crate) fn check_new_arg(command: &CommandSpec, arg: &ArgSpec) -> Result<(), RegistrationError> {
    if arg.name.trim().is_empty() {
        return Err(RegistrationError::EmptyArgName);
    }
    if command.args.iter().any(|a| a.name == arg.name) {
        return Err(RegistrationError::DuplicateArgName(arg.name.clone()));
    }

    for surface in long_surfaces(arg) {
        if !valid_long(surface) {
            return Err(RegistrationError::InvalidSurface {
                arg: arg.name.clone(),
                surface: surface.to_string(),
            });
        }
    }
    if arg.short == Some('-') {
        return Err(RegistrationError::InvalidSurface {
            arg: arg.name.clone(),
            surface: "-".to_string(),
        });
    }

    for existing in &command.args {
        if let Some(surface) = surface_collision(existing, arg) {
            return Err(RegistrationError::DuplicateSurface {
                arg: arg.name.clone(),
                surface,
            });
        }
    }

    if arg.positional && arg.persistent {
        return Err(RegistrationError::PersistentPositional(arg.name.clone()));
    }
    if arg.positional && !command.subcommands.is_empty() && !command.allow_subcommand_positionals {
        return Err(RegistrationError::MixedPositionals(command.name.clone()));
    }

    Ok(())
}

pub(crate) fn check_new_subcommand(
    parent: &CommandSpec,
    child: &CommandSpec,
) -> Result<(), RegistrationError> {
    if child.name.trim().is_empty() {
        return Err(RegistrationError::EmptyCommandName);
    }
    if parent.subcommands.iter().any(|s| s.name == child.name) {
        return Err(RegistrationError::DuplicateSubcommand(child.name.clone()));
    }
    if parent.has_positionals() && !parent.allow_subcommand_positionals {
        return Err(RegistrationError::MixedPositionals(parent.name.clone()));
    }

    // Persistent arguments push down through every level, so the whole
    // subtree is checked, not just the direct child.
    for persistent in parent.persistent_args() {
        check_persistent_against(persistent, child)?;
    }

    Ok(())
}

fn check_persistent_against(
    persistent: &ArgSpec,
    command: &CommandSpec,
) -> Result<(), RegistrationError> {
    for arg in &command.args {
        if let Some(surface) = surface_collision(persistent, arg) {
            return Err(RegistrationError::PersistentConflict {
                persistent: persistent.name.clone(),
                command: command.name.clone(),
                surface,
            });
        }
    }
    for sub in &command.subcommands {
        check_persistent_against(persistent, sub)?;
    }
    Ok(())
}

pub(crate) fn check_group_members<I, S>(
    command: &CommandSpec,
    rule: &str,
    members: I,
) -> Result<Vec<String>, RegistrationError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let members: Vec<String> = members.into_iter().map(Into::into).collect();
    for name in &members {
        if command.find_arg(name).is_none() {
            return Err(RegistrationError::UnknownGroupMember {
                rule: rule.to_string(),
                name: name.clone(),
            });
        }
    }
    Ok(members)
}

/// Validates a finished command tree.
///
/// Runs every registration-time check over the tree as a whole. Trees built
/// through the fallible builder methods are already valid; this is the
/// entry point for trees produced by deserialization.
pub fn validate_command(command: &CommandSpec) -> Result<(), RegistrationError> {
    if command.name.trim().is_empty() {
        return Err(RegistrationError::EmptyCommandName);
    }

    let mut names: HashSet<&str> = HashSet::new();
    for (idx, arg) in command.args.iter().enumerate() {
        if arg.name.trim().is_empty() {
            return Err(RegistrationError::EmptyArgName);
        }
        if !names.insert(arg.name.as_str()) {
            return Err(RegistrationError::DuplicateArgName(arg.name.clone()));
        }
        for surface in long_surfaces(arg) {
            if !valid_long(surface) {
                return Err(RegistrationError::InvalidSurface {
                    arg: arg.name.clone(),
                    surface: surface.to_string(),
                });
            }
        }
        if arg.short == Some('-') {
            return Err(RegistrationError::InvalidSurface {
                arg: arg.name.clone(),
                surface: "-".to_string(),
            });
        }
        if arg.positional && arg.persistent {
            return Err(RegistrationError::PersistentPositional(arg.name.clone()));
        }
        for other in &command.args[..idx] {
            if let Some(surface) = surface_collision(other, arg) {
                return Err(RegistrationError::DuplicateSurface {
                    arg: arg.name.clone(),
                    surface,
                });
            }
        }
    }

    if command.has_positionals()
        && !command.subcommands.is_empty()
        && !command.allow_subcommand_positionals
    {
        return Err(RegistrationError::MixedPositionals(command.name.clone()));
    }

    let groups = [
        ("mutually-exclusive", &command.mutually_exclusive),
        ("required-together", &command.required_together),
        ("one-required", &command.one_required),
    ];
    for (rule, group_list) in groups {
        for group in group_list.iter() {
            check_group_members(command, rule, group.iter().map(String::as_str))?;
        }
    }
    for conditional in &command.conditionals {
        check_group_members(
            command,
            "conditional",
            [conditional.target.as_str(), conditional.condition.as_str()],
        )?;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for sub in &command.subcommands {
        if sub.name.trim().is_empty() {
            return Err(RegistrationError::EmptyCommandName);
        }
        if !seen.insert(sub.name.as_str()) {
            return Err(RegistrationError::DuplicateSubcommand(sub.name.clone()));
        }
        for persistent in command.persistent_args() {
            check_persistent_against(persistent, sub)?;
        }
        validate_command(sub)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_duplicate_long_alias() {
        let err = CommandSpec::new("app")
            .arg(ArgSpec::option("output").alias("out"))
            .unwrap()
            .arg(ArgSpec::option("outfile").long("out"))
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateSurface {
                arg: "outfile".to_string(),
                surface: "--out".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_positional_with_subcommands_without_opt_in() {
        let err = CommandSpec::new("app")
            .subcommand(CommandSpec::new("run"))
            .unwrap()
            .arg(ArgSpec::positional("file"))
            .unwrap_err();
        assert_eq!(err, RegistrationError::MixedPositionals("app".to_string()));

        let err = CommandSpec::new("app")
            .arg(ArgSpec::positional("file"))
            .unwrap()
            .subcommand(CommandSpec::new("run"))
            .unwrap_err();
        assert_eq!(err, RegistrationError::MixedPositionals("app".to_string()));
    }

    #[test]
    fn test_opt_in_allows_mixing() {
        let spec = CommandSpec::new("app")
            .allow_subcommand_positionals()
            .arg(ArgSpec::positional("file"))
            .unwrap()
            .subcommand(CommandSpec::new("run"))
            .unwrap();
        assert!(spec.has_positionals());
        assert_eq!(spec.subcommands.len(), 1);
    }

    #[test]
    fn test_rejects_persistent_collision_in_subtree() {
        let grandchild = CommandSpec::new("leaf")
            .arg(ArgSpec::flag("verbose").short('x'))
            .unwrap();
        let child = CommandSpec::new("mid").subcommand(grandchild).unwrap();

        let err = CommandSpec::new("app")
            .arg(ArgSpec::flag("verbose").short('v').persistent())
            .unwrap()
            .subcommand(child)
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::PersistentConflict {
                persistent: "verbose".to_string(),
                command: "leaf".to_string(),
                surface: "--verbose".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_unknown_group_member() {
        let err = CommandSpec::new("app")
            .arg(ArgSpec::flag("json"))
            .unwrap()
            .exclusive(["json", "yaml"])
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::UnknownGroupMember {
                rule: "mutually-exclusive".to_string(),
                name: "yaml".to_string(),
            }
        );
    }

    #[test]
    fn test_validate_command_catches_deserialized_conflicts() {
        let mut spec = CommandSpec::new("app");
        spec.args.push(ArgSpec::flag("verbose").short('v'));
        spec.args.push(ArgSpec::flag("version-info").short('v'));

        let err = validate_command(&spec).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateSurface { .. }));
    }

    #[test]
    fn test_validate_command_accepts_valid_tree() {
        let spec = CommandSpec::new("app")
            .arg(ArgSpec::flag("verbose").short('v').persistent())
            .unwrap()
            .subcommand(
                CommandSpec::new("search")
                    .arg(ArgSpec::positional("pattern").required())
                    .unwrap(),
            )
            .unwrap();
        assert!(validate_command(&spec).is_ok());
    }
}
