//! Declarative typed flag structs.

/// Declares a flag struct and its [`FromFlags`](crate::FromFlags) impl.
///
/// Each field is `kind` (`boolean` or `string`), optionally followed by a
/// parenthesized chain of [`FlagDescriptor`](crate::FlagDescriptor) builder
/// calls. Boolean fields become `Option<bool>`, string fields
/// `Option<String>`. The logical flag name is the field name with `_`
/// replaced by `-`.
///
/// # Examples
///
/// ```
/// use command_spec_core::*;
///
/// command_flags! {
///     pub struct BuildFlags {
///         release: boolean(short('r').description("Optimized build")),
///         target_dir: string,
///     }
/// }
///
/// let spec = CommandSpec::new("build").with_flags(BuildFlags::descriptors());
/// let argv: Vec<String> = ["-r", "--target-dir", "out"].iter().map(|s| s.to_string()).collect();
/// let flags: BuildFlags = parse(&spec, &argv, None).unwrap().typed();
///
/// assert_eq!(flags.release, Some(true));
/// assert_eq!(flags.target_dir.as_deref(), Some("out"));
/// ```
#[macro_export]
macro_rules! command_flags {
    (@type boolean) => { ::std::option::Option<bool> };
    (@type string) => { ::std::option::Option<::std::string::String> };
    (@read boolean, $flags:expr, $key:expr) => { $flags.boolean($key) };
    (@read string, $flags:expr, $key:expr) => { $flags.string($key).map(::std::string::String::from) };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $field:ident : $kind:ident $( ( $($chain:tt)* ) )? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        $vis struct $name {
            $( pub $field: $crate::command_flags!(@type $kind), )*
        }

        impl $crate::FromFlags for $name {
            fn descriptors() -> $crate::FlagSet {
                let mut flags = $crate::FlagSet::new();
                $(
                    flags.insert(
                        $crate::field_flag_name(stringify!($field)),
                        $crate::flag::$kind() $( .$($chain)* )?,
                    );
                )*
                flags
            }

            fn from_flags(flags: &$crate::NormalizedFlags) -> Self {
                Self {
                    $(
                        $field: $crate::command_flags!(
                            @read $kind, flags, &$crate::field_flag_name(stringify!($field))
                        ),
                    )*
                }
            }
        }
    };
}

/// Maps a Rust field name to its logical flag name (`dry_run` → `dry-run`).
#[doc(hidden)]
pub fn field_flag_name(field: &str) -> String {
    field.trim_start_matches("r#").replace('_', "-")
}
