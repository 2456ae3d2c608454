//! Token engine: turns raw command-line tokens into a [`ParsedResult`].
//!
//! The parse entry point only depends on the [`TokenParser`] trait; any
//! engine that honors permissive mode, boolean/string coercion and alias
//! forwarding can be swapped in. [`ArgEngine`] is the built-in one.
//!
//! # Token rules of [`ArgEngine`]
//!
//! - `--name` and `--name=value` are long tokens; `-c` is a short token and
//!   `-abc` is read as `-a -b -c`.
//! - A string option takes its inline value or the next token. A next token
//!   that looks like an option (`-x`) does not count as a value.
//! - The last occurrence of a repeated option wins.
//! - `--` ends option processing; everything after it is passed through.
//!   With [`EngineOptions::double_dash`] off, `--` is an ordinary value.
//! - A lone `-` is an ordinary value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ParseError, Result};
use crate::{Coercion, FlagValue, LONG_MARKER, ParserInputSpec, SHORT_MARKER};

/// Options passed to a [`TokenParser`].
///
/// The parse entry point always runs engines in permissive mode. Turning it
/// off is for callers driving an engine directly, e.g. to reject typos in a
/// substitute engine's own test suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Collect unrecognized option tokens instead of failing with
    /// [`ParseError::UnknownFlag`].
    pub permissive: bool,
    /// Treat `--` as the end of options.
    pub double_dash: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            permissive: true,
            double_dash: true,
        }
    }
}

/// Raw engine output keyed by parser-facing tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResult {
    /// Coerced values keyed by the long token that owns them.
    pub values: BTreeMap<String, FlagValue>,
    /// Unrecognized options and bare values, in command-line order.
    pub rest: Vec<String>,
    /// Bare values only, in command-line order.
    pub positional: Vec<String>,
    /// Tokens after the `--` terminator.
    pub passthrough: Vec<String>,
}

/// A capability that parses tokens against a [`ParserInputSpec`].
pub trait TokenParser {
    fn parse_tokens(
        &self,
        spec: &ParserInputSpec,
        tokens: &[String],
        options: EngineOptions,
    ) -> Result<ParsedResult>;
}

/// Built-in token engine.
///
/// # Examples
///
/// ```
/// use command_spec_core::*;
///
/// let spec = normalize_spec(&FlagSet::new().with("help", flag::boolean().short('h')));
/// let tokens: Vec<String> = ["--unknown", "x", "-h"].iter().map(|s| s.to_string()).collect();
///
/// let result = ArgEngine.parse_tokens(&spec, &tokens, EngineOptions::default()).unwrap();
/// assert_eq!(result.values.get("--help"), Some(&FlagValue::Bool(true)));
/// assert_eq!(result.rest, vec!["--unknown", "x"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgEngine;

impl TokenParser for ArgEngine {
    fn parse_tokens(
        &self,
        spec: &ParserInputSpec,
        tokens: &[String],
        options: EngineOptions,
    ) -> Result<ParsedResult> {
        let mut cursor = Cursor::new(tokens, options);
        let mut result = ParsedResult::default();

        while let Some(token) = cursor.next() {
            if options.double_dash && token == LONG_MARKER {
                result.passthrough.extend(cursor.drain());
                break;
            }

            if !cursor.is_option(&token) {
                result.positional.push(token.clone());
                result.rest.push(token);
                continue;
            }

            let parts = split_option(&token);
            let last = parts.len() - 1;
            for (idx, (part, inline)) in parts.into_iter().enumerate() {
                let resolved = spec.resolve(&part).map(|(owner, c)| (owner.to_string(), c));
                let Some((owner, coercion)) = resolved else {
                    if !options.permissive {
                        return Err(ParseError::UnknownFlag(part));
                    }
                    trace!(token = %part, "unrecognized option");
                    match inline {
                        Some(value) => result.rest.push(format!("{part}={value}")),
                        None => result.rest.push(part),
                    }
                    continue;
                };

                let value = match coercion {
                    Coercion::Boolean => FlagValue::Bool(true),
                    Coercion::String if idx != last => {
                        return Err(ParseError::MissingValueInGroup(part));
                    }
                    Coercion::String => match inline {
                        Some(value) => FlagValue::String(value),
                        None => FlagValue::String(cursor.next_value(&part)?),
                    },
                };
                result.values.insert(owner, value);
            }
        }

        Ok(result)
    }
}

/// Forward-only view over the token list.
///
/// Tokens are stored reversed so the next one is popped off the end.
struct Cursor {
    rargs: Vec<String>,
    double_dash: bool,
}

impl Cursor {
    fn new(tokens: &[String], options: EngineOptions) -> Self {
        let mut rargs = tokens.to_vec();
        rargs.reverse();
        Self {
            rargs,
            double_dash: options.double_dash,
        }
    }

    /// Whether `token` is an option rather than a value.
    fn is_option(&self, token: &str) -> bool {
        if token == LONG_MARKER {
            return self.double_dash;
        }
        token.len() > 1 && token.starts_with(SHORT_MARKER)
    }

    fn next(&mut self) -> Option<String> {
        self.rargs.pop()
    }

    fn peek_flag(&self) -> Option<&str> {
        self.rargs
            .last()
            .map(String::as_str)
            .filter(|it| self.is_option(it))
    }

    fn next_value(&mut self, flag: &str) -> Result<String> {
        if self.peek_flag().is_some() {
            return Err(ParseError::MissingValue(flag.to_string()));
        }
        self.next()
            .ok_or_else(|| ParseError::MissingValue(flag.to_string()))
    }

    fn drain(&mut self) -> impl Iterator<Item = String> + '_ {
        self.rargs.drain(..).rev()
    }
}

/// Splits one option token into `(token, inline value)` parts.
///
/// `--name=value` keeps its value; a short group `-abc` becomes `-a`, `-b`,
/// `-c` with no inline values.
fn split_option(token: &str) -> Vec<(String, Option<String>)> {
    if token.starts_with(LONG_MARKER) {
        return match token.split_once('=') {
            Some((name, value)) => vec![(name.to_string(), Some(value.to_string()))],
            None => vec![(token.to_string(), None)],
        };
    }

    let letters = &token[SHORT_MARKER.len()..];
    if letters.chars().count() == 1 {
        return vec![(token.to_string(), None)];
    }
    letters
        .chars()
        .map(|c| (format!("{SHORT_MARKER}{c}"), None))
        .collect()
}
