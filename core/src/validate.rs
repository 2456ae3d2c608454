//! Specification validation.
//!
//! Catches structural mistakes in a [`CommandSpec`] such as two flags sharing
//! a short alias, malformed flag names, and argument orderings that can never
//! be satisfied. The normalizers never validate on their own; the parse entry
//! point runs [`validate_flags`] on the effective flag set first.
//!
//! # Examples
//!
//! ```
//! use command_spec_core::*;
//!
//! let spec = CommandSpec::new("tool").with_flag("verbose", flag::boolean().short('v'));
//! assert!(validate_spec(&spec).is_empty());
//!
//! // Invalid: two flags claim `-v`
//! let bad = spec.with_flag("version", flag::boolean().short('v'));
//! assert!(!validate_spec(&bad).is_empty());
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{ArgumentDescriptor, CommandSpec, FlagSet};

/// Specification validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// A flag has an empty logical name.
    #[error("flag name cannot be empty")]
    EmptyFlagName,
    /// Flag name carries a dash prefix, whitespace, or `=`.
    #[error("invalid flag name: {0}")]
    InvalidFlagName(String),
    /// Alias is not a single ASCII letter.
    #[error("invalid short alias for --{flag}: {short:?}")]
    InvalidShortAlias { flag: String, short: char },
    /// Two flags declare the same short alias.
    #[error("short alias -{short} is declared by both --{first} and --{second}")]
    DuplicateShortAlias {
        short: char,
        first: String,
        second: String,
    },
    /// Positional argument name is empty.
    #[error("argument name cannot be empty")]
    EmptyArgumentName,
    /// Two positional arguments share a name.
    #[error("duplicate argument: {0}")]
    DuplicateArgument(String),
    /// A required argument follows an optional one.
    #[error("required argument {required} follows optional argument {optional}")]
    RequiredAfterOptional { required: String, optional: String },
    /// A literal default is not among the argument's options.
    #[error("default for argument {name} is not one of its options: {value}")]
    DefaultNotInOptions { name: String, value: String },
}

/// Validates a whole command specification.
///
/// Returns at most one error: validation stops at the first problem found.
///
/// # Examples
///
/// ```
/// use command_spec_core::*;
///
/// let spec = CommandSpec::new("cp")
///     .with_arg(ArgumentDescriptor::new("source"))
///     .with_arg(ArgumentDescriptor::new("dest").required());
///
/// let errors = validate_spec(&spec);
/// assert!(matches!(errors[0], ValidationError::RequiredAfterOptional { .. }));
/// ```
pub fn validate_spec(spec: &CommandSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if spec.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }

    errors.extend(validate_flags(&spec.flags));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_args(&spec.args));
    errors
}

/// Validates flag names and short aliases.
pub fn validate_flags(flags: &FlagSet) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashMap<char, &str> = HashMap::new();

    for (name, descriptor) in flags.iter() {
        if name.is_empty() {
            errors.push(ValidationError::EmptyFlagName);
            return errors;
        }

        if name.starts_with('-') || name.contains(|c: char| c.is_whitespace() || c == '=') {
            errors.push(ValidationError::InvalidFlagName(name.to_string()));
            return errors;
        }

        if let Some(short) = descriptor.short {
            if !short.is_ascii_alphabetic() {
                errors.push(ValidationError::InvalidShortAlias {
                    flag: name.to_string(),
                    short,
                });
                return errors;
            }
            if let Some(first) = seen.insert(short, name) {
                errors.push(ValidationError::DuplicateShortAlias {
                    short,
                    first: first.to_string(),
                    second: name.to_string(),
                });
                return errors;
            }
        }
    }

    errors
}

fn validate_args(args: &[ArgumentDescriptor]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut last_optional: Option<&str> = None;

    for arg in args {
        let name = arg.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::EmptyArgumentName);
            return errors;
        }

        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateArgument(name.to_string()));
            return errors;
        }

        if arg.required {
            if let Some(optional) = last_optional {
                errors.push(ValidationError::RequiredAfterOptional {
                    required: name.to_string(),
                    optional: optional.to_string(),
                });
                return errors;
            }
        } else {
            last_optional = Some(name);
        }

        if let Some(crate::ArgDefault::Value(value)) = &arg.default {
            if !arg.allows(value) {
                errors.push(ValidationError::DefaultNotInOptions {
                    name: name.to_string(),
                    value: value.clone(),
                });
                return errors;
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use crate::flag;

    use super::*;

    #[test]
    fn test_validate_rejects_duplicate_alias() {
        let spec = CommandSpec::new("tool")
            .with_flag("help", flag::boolean().short('h'))
            .with_flag("host", flag::string().short('h'));

        let errors = validate_spec(&spec);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateShortAlias {
                short: 'h',
                first: "help".to_string(),
                second: "host".to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_rejects_dashed_flag_name() {
        let flags = FlagSet::new().with("--verbose", flag::boolean());

        let errors = validate_flags(&flags);
        assert_eq!(
            errors,
            vec![ValidationError::InvalidFlagName("--verbose".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_non_letter_alias() {
        let flags = FlagSet::new().with("level", flag::string().short('1'));

        let errors = validate_flags(&flags);
        assert_eq!(
            errors,
            vec![ValidationError::InvalidShortAlias {
                flag: "level".to_string(),
                short: '1',
            }]
        );
    }

    #[test]
    fn test_validate_case_sensitive_aliases() {
        let flags = FlagSet::new()
            .with("verbose", flag::boolean().short('v'))
            .with("version", flag::boolean().short('V'));

        assert!(validate_flags(&flags).is_empty());
    }

    #[test]
    fn test_validate_rejects_duplicate_argument() {
        let spec = CommandSpec::new("tool")
            .with_arg(ArgumentDescriptor::new("file"))
            .with_arg(ArgumentDescriptor::new("file"));

        let errors = validate_spec(&spec);
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateArgument("file".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_default_outside_options() {
        let spec = CommandSpec::new("build").with_arg(
            ArgumentDescriptor::new("profile")
                .with_options(&["debug", "release"])
                .with_default("fast"),
        );

        let errors = validate_spec(&spec);
        assert_eq!(
            errors,
            vec![ValidationError::DefaultNotInOptions {
                name: "profile".to_string(),
                value: "fast".to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_rejects_empty_command_name() {
        let spec = CommandSpec::new("  ");
        assert_eq!(validate_spec(&spec), vec![ValidationError::EmptyCommandName]);
    }

    #[test]
    fn test_validate_accepts_valid_spec() {
        let spec = CommandSpec::new("deploy")
            .with_flag("force", flag::boolean().short('f'))
            .with_flag("region", flag::string().short('r'))
            .with_arg(ArgumentDescriptor::new("env").required())
            .with_arg(ArgumentDescriptor::new("tag").with_default("latest"));

        assert!(validate_spec(&spec).is_empty());
    }
}
