//!
//! # Enum-String Mapping Module
//!
//! Defines the [enumstr] macro and paired [EnumStr] trait,
//! mapping between a fieldless enum and the bare keywords of a text format.
//! KiCad files expose many closed vocabularies this way:
//! pad types (`smd`, `thru_hole`), keepout rules (`allowed`, `not_allowed`),
//! worksheet corners (`ltcorner`, `rbcorner`), and so on.
//!
//! The [EnumStr] trait defines two central methods:
//! * `to_str(&self) -> &'static str` converts the enum to its keyword.
//! * `from_str(&str) -> Option<Self>` does the opposite, returning `None` for unknown keywords.
//!
//! Example:
//!
//! ```rs
//! use kicad21utils::enumstr;
//!
//! enumstr!(
//! /// # Keepout Rules
//! KeepoutRule {
//!     Allowed: "allowed",
//!     NotAllowed: "not_allowed",
//!  }
//! );
//! ```
//!

///
/// # String-Enumeration Trait
///
/// While [EnumStr] can be implemented by any type, its primary intent is
/// for implementation by the [enumstr] macro.
///
pub trait EnumStr: std::marker::Sized {
    fn to_str(&self) -> &'static str;
    fn from_str(txt: &str) -> Option<Self>;
    /// All keyword values, in declaration order
    fn keywords() -> &'static [&'static str];
}

///
/// # Enum-String Pairing Macro
///
/// Creates an `enum` which:
/// * (a) Has paired keyword values, as arrive in S-expression atoms.
/// * (b) Implements the [EnumStr] trait for conversions to and from these keywords.
/// * (c) Implements [std::fmt::Display], writing the keyword.
///
/// All variants are fieldless. Derives include `serde::{Serialize, Deserialize}`
/// and `schemars::JsonSchema`, so invoking crates depend on both.
///
#[macro_export]
macro_rules! enumstr {
    (   $(#[$meta: meta])*
        $enum_name: ident {
        $( $variant: ident : $strval: literal ),* $(,)?
    }) => {
        $(#[$meta])*
        #[allow(dead_code)]
        #[derive(
            Clone,
            Copy,
            Debug,
            ::serde::Deserialize,
            ::serde::Serialize,
            ::schemars::JsonSchema,
            PartialEq,
            Eq,
        )]
        pub enum $enum_name {
            $( #[doc=$strval]
                $variant ),*
        }
        impl $crate::EnumStr for $enum_name {
            /// Convert a [$enum_name] variant to its paired keyword.
            fn to_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $strval),*,
                }
            }
            /// Create a [$enum_name] from one of its keywords.
            /// Returns `None` if `txt` does not match one of [$enum_name]'s variants.
            /// Matching is case sensitive, as KiCad keywords are.
            fn from_str(txt: &str) -> Option<Self> {
                match txt {
                    $( $strval => Some(Self::$variant)),*,
                    _ => None,
                }
            }
            fn keywords() -> &'static [&'static str] {
                &[ $( $strval ),* ]
            }
        }
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                let s = match self {
                    $( Self::$variant => $strval),*,
                };
                write!(f, "{}", s)
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_enumstr() {
        enumstr!(
            /// # Pad Kinds
            PadKind {
                Smd: "smd",
                ThruHole: "thru_hole",
            }
        );

        assert_eq!(PadKind::Smd.to_str(), "smd");
        assert_eq!(PadKind::ThruHole.to_string(), "thru_hole");

        assert_eq!(PadKind::from_str("smd"), Some(PadKind::Smd));
        assert_eq!(PadKind::from_str("thru_hole"), Some(PadKind::ThruHole));
        assert_eq!(PadKind::from_str("SMD"), None);

        assert_eq!(PadKind::keywords(), &["smd", "thru_hole"]);
    }
}
