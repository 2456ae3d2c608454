//! Positional argument mapping.
//!
//! Bare values recorded by the token engine are assigned to the declared
//! [`ArgumentDescriptor`]s in order. Unrecognized options are never treated
//! as positional values; everything after `--` always is.

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};
use crate::{ArgumentDescriptor, ParsedResult};

/// Positional values keyed by argument name, in declaration order.
///
/// Serializes as a map (`{"src": "a", "dst": "b"}`) whose entries keep that
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedArgs(Vec<(String, String)>);

impl NormalizedArgs {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for NormalizedArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NormalizedArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct ArgsVisitor;

        impl<'de> Visitor<'de> for ArgsVisitor {
            type Value = NormalizedArgs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of argument names to values")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut values = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, String>()? {
                    values.push(entry);
                }
                Ok(NormalizedArgs(values))
            }
        }

        deserializer.deserialize_map(ArgsVisitor)
    }
}

/// Collects the positional tokens of a parse result: bare values, then
/// everything after the terminator.
pub fn positional_tokens(result: &ParsedResult) -> Vec<String> {
    result
        .positional
        .iter()
        .chain(result.passthrough.iter())
        .cloned()
        .collect()
}

/// Assigns positional tokens to declared arguments.
///
/// Missing values fall back to the argument's default. With `strict`,
/// tokens beyond the declared arguments are rejected.
///
/// # Examples
///
/// ```
/// use command_spec_core::*;
///
/// let decls = vec![
///     ArgumentDescriptor::new("env").required(),
///     ArgumentDescriptor::new("tag").with_default("latest"),
/// ];
/// let args = resolve_args(&decls, &["prod".to_string()], false).unwrap();
///
/// assert_eq!(args.get("env"), Some("prod"));
/// assert_eq!(args.get("tag"), Some("latest"));
/// ```
pub fn resolve_args(
    decls: &[ArgumentDescriptor],
    tokens: &[String],
    strict: bool,
) -> Result<NormalizedArgs> {
    let mut values = Vec::with_capacity(decls.len());

    for (idx, decl) in decls.iter().enumerate() {
        let value = match tokens.get(idx) {
            Some(token) => Some(token.clone()),
            None => decl.default.as_ref().map(|d| d.resolve()),
        };

        let Some(value) = value else {
            if decl.required {
                return Err(ParseError::MissingArgument(decl.name.clone()));
            }
            continue;
        };

        if !decl.allows(&value) {
            return Err(ParseError::InvalidArgument {
                name: decl.name.clone(),
                value,
                allowed: decl.options.clone(),
            });
        }
        values.push((decl.name.clone(), value));
    }

    if strict {
        if let Some(extra) = tokens.get(decls.len()) {
            return Err(ParseError::UnexpectedArgument(extra.clone()));
        }
    }

    Ok(NormalizedArgs(values))
}
