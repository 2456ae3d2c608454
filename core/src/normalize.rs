//! Translation between declared flags and the token engine.
//!
//! [`normalize_spec`] turns a [`FlagSet`] into the token-keyed
//! [`ParserInputSpec`] the engine consumes, and [`normalize_result`] turns the
//! engine's token-keyed [`ParsedResult`] back into [`NormalizedFlags`] keyed by
//! logical flag name. Together they round-trip: every key that survives
//! normalization is a logical name from the original flag set.
//!
//! # Examples
//!
//! ```
//! use command_spec_core::*;
//!
//! let flags = FlagSet::new().with("help", flag::boolean().short('h'));
//! let spec = normalize_spec(&flags);
//!
//! assert_eq!(spec.get("--help"), Some(&TokenRule::Coerce(Coercion::Boolean)));
//! assert_eq!(spec.get("-h"), Some(&TokenRule::Forward("--help".to_string())));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{FlagKind, FlagSet, LONG_MARKER, ParsedResult, SHORT_MARKER};

/// How the engine converts a matched token into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coercion {
    /// Presence yields `true`; consumes no value.
    Boolean,
    /// Consumes one value, kept verbatim.
    String,
}

impl From<FlagKind> for Coercion {
    fn from(kind: FlagKind) -> Self {
        match kind {
            FlagKind::Boolean => Self::Boolean,
            FlagKind::String => Self::String,
        }
    }
}

/// Rule bound to one parser-facing token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenRule {
    /// The token is a value source with this coercion.
    Coerce(Coercion),
    /// The token redirects to another token (short alias → long form).
    Forward(String),
}

/// Parser-facing representation of a flag set, keyed by token
/// (`--name`, `-c`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParserInputSpec(BTreeMap<String, TokenRule>);

impl ParserInputSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>, rule: TokenRule) {
        self.0.insert(token.into(), rule);
    }

    pub fn get(&self, token: &str) -> Option<&TokenRule> {
        self.0.get(token)
    }

    /// Follows forwarding references from `token` to the token that owns a
    /// coercion rule.
    ///
    /// Returns `None` for unknown tokens, dangling references and cycles.
    pub fn resolve<'a>(&'a self, token: &'a str) -> Option<(&'a str, Coercion)> {
        let mut current = token;
        // Each hop visits a distinct key unless there is a cycle.
        for _ in 0..=self.0.len() {
            match self.0.get(current)? {
                TokenRule::Coerce(coercion) => return Some((current, *coercion)),
                TokenRule::Forward(target) => current = target.as_str(),
            }
        }
        None
    }

    /// Iterates `(token, rule)` pairs in token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenRule)> {
        self.0.iter().map(|(token, rule)| (token.as_str(), rule))
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A coerced flag value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    String(String),
}

impl FlagValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Bool(_) => None,
            Self::String(value) => Some(value),
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Flag values keyed by logical flag name.
///
/// Flags that were not given on the command line are absent.
///
/// # Examples
///
/// ```
/// use command_spec_core::NormalizedFlags;
///
/// let flags: NormalizedFlags = [("help", true.into()), ("name", "x".into())]
///     .into_iter()
///     .collect();
/// assert_eq!(flags.boolean("help"), Some(true));
/// assert_eq!(flags.string("name"), Some("x"));
/// assert_eq!(flags.boolean("quiet"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedFlags(BTreeMap<String, FlagValue>);

impl NormalizedFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Value of a boolean flag, `None` when absent or not a boolean.
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FlagValue::as_bool)
    }

    /// Value of a string flag, `None` when absent or not a string.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FlagValue::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, FlagValue)> for NormalizedFlags {
    fn from_iter<I: IntoIterator<Item = (S, FlagValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Builds the engine-facing spec for a flag set.
///
/// Each flag yields a `--name` token bound to its coercion; a flag with a
/// short alias also yields `-c` forwarding to `--name`. No validation is done
/// here: duplicate aliases simply overwrite each other.
pub fn normalize_spec(flags: &FlagSet) -> ParserInputSpec {
    let mut spec = ParserInputSpec::new();

    for (name, descriptor) in flags.iter() {
        let long = format!("{LONG_MARKER}{name}");
        if let Some(short) = descriptor.short {
            spec.insert(
                format!("{SHORT_MARKER}{short}"),
                TokenRule::Forward(long.clone()),
            );
        }
        spec.insert(long, TokenRule::Coerce(descriptor.kind.into()));
    }

    spec
}

/// Re-keys an engine result by logical flag name.
///
/// Keys carrying the long marker lose exactly that marker; any other key is
/// dropped. Values pass through untouched.
pub fn normalize_result(result: &ParsedResult) -> NormalizedFlags {
    let mut flags = NormalizedFlags::new();

    for (token, value) in &result.values {
        match token.strip_prefix(LONG_MARKER) {
            Some(name) => {
                flags.0.insert(name.to_string(), value.clone());
            }
            None => trace!(token = %token, "dropping non-long token from parse result"),
        }
    }

    flags
}
