//! Declarative command specification types.
//!
//! A [`CommandSpec`] is authored once per command and shared read-only by
//! every invocation. All types serialize with [`serde`] so specifications can
//! live in YAML or JSON files next to the program that uses them.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Prefix the token engine uses for long-form option tokens.
pub const LONG_MARKER: &str = "--";

/// Prefix the token engine uses for short-form option tokens.
pub const SHORT_MARKER: &str = "-";

/// Primitive kind of a flag value.
///
/// # Examples
///
/// ```
/// use command_spec_core::FlagKind;
///
/// assert_eq!(FlagKind::default(), FlagKind::Boolean);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlagKind {
    /// Switch with no value; present means `true`.
    #[default]
    Boolean,
    /// Option that takes one string value.
    String,
}

/// Schema for a single flag.
///
/// Build descriptors with [`flag::boolean`](crate::flag::boolean) and
/// [`flag::string`](crate::flag::string), then chain builder methods.
///
/// # Examples
///
/// ```
/// use command_spec_core::{flag, FlagKind};
///
/// let help = flag::boolean().short('h').description("Show help");
/// assert_eq!(help.kind, FlagKind::Boolean);
/// assert_eq!(help.short, Some('h'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDescriptor {
    /// Value kind.
    #[serde(rename = "type")]
    pub kind: FlagKind,
    /// Single-letter alias (e.g. `h` for `-h`).
    #[serde(default, rename = "char", skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hide from help output.
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

impl FlagDescriptor {
    /// Creates a descriptor of the given kind with no alias or metadata.
    pub fn new(kind: FlagKind) -> Self {
        Self {
            kind,
            short: None,
            description: None,
            hidden: false,
        }
    }

    /// Sets the single-letter alias.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Adds a description.
    pub fn description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Marks the flag as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Flag descriptors keyed by logical flag name.
///
/// Entries are kept sorted by name so every derived representation has a
/// stable order.
///
/// # Examples
///
/// ```
/// use command_spec_core::{flag, FlagSet};
///
/// let flags = FlagSet::new()
///     .with("verbose", flag::boolean().short('v'))
///     .with("output", flag::string().short('o'));
///
/// assert_eq!(flags.names().collect::<Vec<_>>(), vec!["output", "verbose"]);
/// assert_eq!(flags.find_short('v').map(|(name, _)| name), Some("verbose"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(BTreeMap<String, FlagDescriptor>);

impl FlagSet {
    /// Creates an empty flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flag, replacing any previous descriptor with the same name.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: FlagDescriptor) {
        self.0.insert(name.into(), descriptor);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, descriptor: FlagDescriptor) -> Self {
        self.insert(name, descriptor);
        self
    }

    /// Looks up a flag by logical name.
    pub fn get(&self, name: &str) -> Option<&FlagDescriptor> {
        self.0.get(name)
    }

    /// Finds the flag that declares `short` as its alias.
    pub fn find_short(&self, short: char) -> Option<(&str, &FlagDescriptor)> {
        self.iter().find(|(_, d)| d.short == Some(short))
    }

    /// Iterates `(name, descriptor)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagDescriptor)> {
        self.0.iter().map(|(name, d)| (name.as_str(), d))
    }

    /// Iterates logical flag names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, FlagDescriptor)> for FlagSet {
    fn from_iter<I: IntoIterator<Item = (S, FlagDescriptor)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Default value for a positional argument.
///
/// Either a literal or a producer invoked each time the default is needed.
/// Producers serialize as the value they produce; deserialized defaults are
/// always literals.
#[derive(Clone)]
pub enum ArgDefault {
    /// Literal value.
    Value(String),
    /// Zero-argument function computing the value.
    Producer(fn() -> String),
}

impl ArgDefault {
    /// Returns the default value, invoking the producer if there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_spec_core::ArgDefault;
    ///
    /// assert_eq!(ArgDefault::Value("main".into()).resolve(), "main");
    /// assert_eq!(ArgDefault::Producer(|| "HEAD".to_string()).resolve(), "HEAD");
    /// ```
    pub fn resolve(&self) -> String {
        match self {
            Self::Value(value) => value.clone(),
            Self::Producer(produce) => produce(),
        }
    }
}

impl fmt::Debug for ArgDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

impl Serialize for ArgDefault {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.resolve())
    }
}

impl<'de> Deserialize<'de> for ArgDefault {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::Value)
    }
}

/// Schema for a positional argument.
///
/// # Examples
///
/// ```
/// use command_spec_core::ArgumentDescriptor;
///
/// let target = ArgumentDescriptor::new("target")
///     .required()
///     .with_options(&["debug", "release"]);
/// assert!(target.required);
/// assert!(target.allows("release"));
/// assert!(!target.allows("profile"));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    /// Name of the argument, unique within its command.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Must a value be present (from the command line or a default)?
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Hide from help output.
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    /// Value used when the command line does not supply one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ArgDefault>,
    /// Allowed values; empty means any value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ArgumentDescriptor {
    /// Creates an optional argument with no metadata.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Marks the argument as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Sets a literal default.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default = Some(ArgDefault::Value(value.to_string()));
        self
    }

    /// Sets a computed default.
    pub fn with_default_fn(mut self, produce: fn() -> String) -> Self {
        self.default = Some(ArgDefault::Producer(produce));
        self
    }

    /// Restricts the argument to a fixed set of values.
    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Returns `true` if `value` satisfies the `options` restriction.
    pub fn allows(&self, value: &str) -> bool {
        self.options.is_empty() || self.options.iter().any(|o| o == value)
    }
}

/// Static declaration of a command.
///
/// # Examples
///
/// ```
/// use command_spec_core::{flag, ArgumentDescriptor, CommandSpec};
///
/// let spec = CommandSpec::new("deploy")
///     .with_description("Deploy the current build")
///     .with_flag("force", flag::boolean().short('f'))
///     .with_arg(ArgumentDescriptor::new("env").required());
///
/// assert_eq!(spec.name, "deploy");
/// assert_eq!(spec.flags.len(), 1);
/// assert_eq!(spec.arg_names(), vec!["env"]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Command identifier.
    pub name: String,
    /// One-line description shown in listings and as the help header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hide the command from help.
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
    /// Usage lines overriding the generated usage.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub usage: Vec<String>,
    /// Long-form help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Alternative names for the command.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Declared flags.
    #[serde(default)]
    pub flags: FlagSet,
    /// Positional arguments in command-line order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgumentDescriptor>,
    /// Example invocations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

impl CommandSpec {
    /// Creates an empty specification with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds a flag.
    pub fn with_flag(mut self, name: &str, descriptor: FlagDescriptor) -> Self {
        self.flags.insert(name, descriptor);
        self
    }

    /// Replaces the whole flag set.
    pub fn with_flags(mut self, flags: FlagSet) -> Self {
        self.flags = flags;
        self
    }

    /// Appends a positional argument.
    pub fn with_arg(mut self, arg: ArgumentDescriptor) -> Self {
        self.args.push(arg);
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn with_example(mut self, example: &str) -> Self {
        self.examples.push(example.to_string());
        self
    }

    /// Returns `true` if `name` is the command name or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// Gets positional argument names in order.
    pub fn arg_names(&self) -> Vec<&str> {
        self.args.iter().map(|a| a.name.as_str()).collect()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(line) => vec![line],
        OneOrMany::Many(lines) => lines,
    })
}
