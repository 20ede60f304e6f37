//! String conversions for wire-level enums.
//!
//! Entity types, resource states and error kinds all travel as snake_case
//! strings (database columns, webhook headers, JSON payloads). The
//! `impl_wire_enum!` macro generates `as_str`, `Display` and `FromStr` from a
//! single variant table so the three can never drift apart.
//!
//! # Example
//!
//! ```rust
//! use sitecal_domain::impl_wire_enum;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum CalendarKind {
//!     Group,
//!     Personal,
//! }
//!
//! impl_wire_enum!(CalendarKind {
//!     Group => "group",
//!     Personal => "personal",
//! });
//!
//! assert_eq!(CalendarKind::Group.as_str(), "group");
//! assert_eq!("PERSONAL".parse::<CalendarKind>(), Ok(CalendarKind::Personal));
//! ```

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum.
///
/// Parsing trims surrounding whitespace and ignores ASCII case. Unknown input
/// yields an error string naming the enum.
#[macro_export]
macro_rules! impl_wire_enum {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Stable wire representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
