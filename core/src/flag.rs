//! Shorthand constructors for [`FlagDescriptor`]s.
//!
//! ```
//! use command_spec_core::{flag, FlagKind};
//!
//! let verbose = flag::boolean().short('v');
//! let output = flag::string().description("Write output to FILE");
//! assert_eq!(verbose.kind, FlagKind::Boolean);
//! assert_eq!(output.kind, FlagKind::String);
//! ```

use crate::{FlagDescriptor, FlagKind};

/// A switch that is `true` when present.
pub fn boolean() -> FlagDescriptor {
    FlagDescriptor::new(FlagKind::Boolean)
}

/// An option carrying one string value.
pub fn string() -> FlagDescriptor {
    FlagDescriptor::new(FlagKind::String)
}
