//! Declarative command specifications and flag normalization.
//!
//! This crate lets a command be described as static metadata instead of
//! imperative parsing code:
//!
//! - [`CommandSpec`] — the command's declaration (description, usage, aliases,
//!   flags, positional args, examples).
//! - [`FlagDescriptor`] / [`FlagSet`] — flags keyed by logical name, each
//!   `boolean` or `string` with an optional single-letter alias.
//! - [`ArgumentDescriptor`] — an ordered positional argument with optional
//!   default and allowed values.
//!
//! Parsing runs a fixed pipeline: [`normalize_spec`] turns the flag set into
//! token rules (`--name`, `-c` → `--name`), a [`TokenParser`] (by default
//! [`ArgEngine`]) consumes the raw tokens permissively, and
//! [`normalize_result`] re-keys the engine output by logical flag name. The
//! [`parse`] function and the [`Command`] trait wrap the whole pipeline.
//!
//! # Example
//!
//! ```
//! use command_spec_core::*;
//!
//! let spec = CommandSpec::new("test")
//!     .with_flag("help", flag::boolean().short('h'))
//!     .with_flag("name", flag::string());
//!
//! let argv: Vec<String> = ["--name", "value", "--unknown", "-h"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let output = parse(&spec, &argv, None).unwrap();
//!
//! assert_eq!(output.flags.boolean("help"), Some(true));
//! assert_eq!(output.flags.string("name"), Some("value"));
//! assert_eq!(output.flags.len(), 2);
//! assert!(validate_spec(&spec).is_empty());
//! ```

mod args;
mod command;
mod engine;
mod error;
pub mod flag;
mod load;
mod macros;
mod normalize;
mod types;
mod validate;

pub use args::{NormalizedArgs, positional_tokens, resolve_args};
pub use command::{Command, FromFlags, Parser, ParserInput, ParserOutput, parse};
pub use engine::{ArgEngine, EngineOptions, ParsedResult, TokenParser};
pub use error::{CommandError, LoadError, ParseError, Result};
pub use load::SpecFormat;
#[doc(hidden)]
pub use macros::field_flag_name;
pub use normalize::{
    Coercion, FlagValue, NormalizedFlags, ParserInputSpec, TokenRule, normalize_result,
    normalize_spec,
};
pub use types::*;
pub use validate::{ValidationError, validate_flags, validate_spec};
