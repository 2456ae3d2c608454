//! Parse entry point and the command abstraction.
//!
//! A command owns a static [`CommandSpec`] and hands it to the parser through
//! [`Command::spec`]. Calling [`Command::parse`] without a [`ParserInput`]
//! parses against that declaration; an override replaces its flags and/or
//! positional arguments for one call.
//!
//! # Examples
//!
//! ```
//! use command_spec_core::*;
//!
//! struct Greet {
//!     spec: CommandSpec,
//! }
//!
//! impl Command for Greet {
//!     fn spec(&self) -> &CommandSpec {
//!         &self.spec
//!     }
//!
//!     fn run(&mut self, argv: &[String]) -> Result<Option<String>, CommandError> {
//!         let output = self.parse(argv, None)?;
//!         let name = output.flags.string("name").unwrap_or("world");
//!         Ok(Some(format!("hello, {name}")))
//!     }
//! }
//!
//! let mut greet = Greet {
//!     spec: CommandSpec::new("greet").with_flag("name", flag::string().short('n')),
//! };
//! let argv = vec!["-n".to_string(), "ferris".to_string()];
//! assert_eq!(greet.run(&argv).unwrap().as_deref(), Some("hello, ferris"));
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::args::{NormalizedArgs, positional_tokens, resolve_args};
use crate::error::{CommandError, Result};
use crate::{
    ArgEngine, ArgumentDescriptor, CommandSpec, EngineOptions, FlagSet, NormalizedFlags,
    TokenParser, normalize_result, normalize_spec, validate_flags,
};

/// Per-call overrides for [`Parser::parse`].
///
/// Fields left as `None` fall back to the command's own declaration or to
/// the defaults (`strict = false`, `double_dash = true`).
#[derive(Debug, Clone, Default)]
pub struct ParserInput {
    /// Flags to parse instead of the declared ones.
    pub flags: Option<FlagSet>,
    /// Positional arguments to map instead of the declared ones.
    pub args: Option<Vec<ArgumentDescriptor>>,
    /// Reject positional values beyond the declared arguments.
    pub strict: Option<bool>,
    /// Label recorded on the parse span (e.g. the dispatching command path).
    pub context: Option<String>,
    /// Treat `--` as the end of options.
    pub double_dash: Option<bool>,
}

impl ParserInput {
    pub fn with_flags(flags: FlagSet) -> Self {
        Self {
            flags: Some(flags),
            ..Default::default()
        }
    }
}

/// Normalized parse output handed to a command's execution logic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOutput {
    /// Flag values keyed by logical name.
    pub flags: NormalizedFlags,
    /// Values of declared positional arguments.
    pub args: NormalizedArgs,
    /// Every positional token, in order.
    pub argv: Vec<String>,
}

impl ParserOutput {
    /// Converts the flags into a typed flag struct.
    pub fn typed<F: FromFlags>(&self) -> F {
        F::from_flags(&self.flags)
    }
}

/// A closed flag struct derived from a flag set.
///
/// Usually implemented with [`command_flags!`](crate::command_flags).
pub trait FromFlags: Sized {
    /// Flag descriptors backing the struct's fields.
    fn descriptors() -> FlagSet;

    /// Reads the struct's fields from normalized flags.
    fn from_flags(flags: &NormalizedFlags) -> Self;
}

/// Parser bound to a token engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser<E = ArgEngine> {
    engine: E,
}

impl<E: TokenParser> Parser<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Parses `argv` against `spec`, or against the overrides in `input`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidSpec`](crate::ParseError::InvalidSpec)
    /// when the effective flag set is malformed, and propagates engine and
    /// positional errors unchanged. Unrecognized flags are never an error.
    pub fn parse(
        &self,
        spec: &CommandSpec,
        argv: &[String],
        input: Option<&ParserInput>,
    ) -> Result<ParserOutput> {
        let span = debug_span!(
            "parse",
            command = %spec.name,
            context = input.and_then(|i| i.context.as_deref()).unwrap_or_default()
        );
        let _enter = span.enter();

        let flags = input.and_then(|i| i.flags.as_ref()).unwrap_or(&spec.flags);
        let decls = input
            .and_then(|i| i.args.as_deref())
            .unwrap_or(spec.args.as_slice());

        if let Some(err) = validate_flags(flags).into_iter().next() {
            return Err(err.into());
        }

        let token_spec = normalize_spec(flags);
        let options = EngineOptions {
            permissive: true,
            double_dash: input.and_then(|i| i.double_dash).unwrap_or(true),
        };
        let raw = self.engine.parse_tokens(&token_spec, argv, options)?;
        debug!(
            tokens = argv.len(),
            matched = raw.values.len(),
            unrecognized = raw.rest.len(),
            "tokens parsed"
        );

        let argv = positional_tokens(&raw);
        let strict = input.and_then(|i| i.strict).unwrap_or(false);
        let args = resolve_args(decls, &argv, strict)?;

        Ok(ParserOutput {
            flags: normalize_result(&raw),
            args,
            argv,
        })
    }
}

/// Parses `argv` against `spec` with the built-in engine.
///
/// # Examples
///
/// ```
/// use command_spec_core::*;
///
/// let spec = CommandSpec::new("test").with_flag("help", flag::boolean().short('h'));
/// let argv: Vec<String> = ["--unknown", "x", "-h"].iter().map(|s| s.to_string()).collect();
///
/// let output = parse(&spec, &argv, None).unwrap();
/// assert_eq!(output.flags.boolean("help"), Some(true));
/// assert!(!output.flags.contains("unknown"));
/// ```
pub fn parse(
    spec: &CommandSpec,
    argv: &[String],
    input: Option<&ParserInput>,
) -> Result<ParserOutput> {
    Parser::<ArgEngine>::default().parse(spec, argv, input)
}

/// A command built on a declarative specification.
pub trait Command {
    /// The command's static declaration.
    fn spec(&self) -> &CommandSpec;

    /// Executes the command. A returned string is output for the caller.
    fn run(&mut self, argv: &[String]) -> std::result::Result<Option<String>, CommandError>;

    /// Hook for custom help; does nothing unless overridden.
    fn help(&self) {}

    /// Parses `argv`, defaulting to [`spec`](Self::spec) when `input` is `None`.
    fn parse(&self, argv: &[String], input: Option<&ParserInput>) -> Result<ParserOutput> {
        Parser::<ArgEngine>::default().parse(self.spec(), argv, input)
    }

    /// Parses `argv` against `F`'s flags and returns them typed.
    fn parse_flags<F: FromFlags>(&self, argv: &[String]) -> Result<F>
    where
        Self: Sized,
    {
        let input = ParserInput::with_flags(F::descriptors());
        Ok(self.parse(argv, Some(&input))?.typed())
    }
}
