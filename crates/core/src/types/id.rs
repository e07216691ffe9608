//! Newtype IDs for backend entity references.
//!
//! The backend hands out integer keys, but some endpoints serialize them as
//! strings. Every ID type decodes from either form so call sites never have
//! to care.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Error returned when a string is not a valid entity ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid id: {0:?}")]
pub struct ParseIdError(pub String);

/// Parse a positive integer ID, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`ParseIdError`] if the value is empty, not an integer, or not
/// greater than zero.
pub fn parse_id(raw: &str) -> Result<i64, ParseIdError> {
    let trimmed = raw.trim();
    match trimmed.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ParseIdError(raw.to_owned())),
    }
}

/// Decode an ID from a JSON number or a numeric string.
///
/// Used by the [`define_id!`] expansion; not meant to be called directly.
#[doc(hidden)]
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Int(id) => Ok(id),
        RawId::Text(text) => parse_id(&text).map_err(serde::de::Error::custom),
    }
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - transparent `Serialize`, lenient `Deserialize` (number or numeric string)
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Ord`, `Hash`
/// - `new()`, `as_i64()`, `Display`, `FromStr`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use depot_core::define_id;
/// define_id!(BinId);
///
/// let id: BinId = "42".parse().unwrap();
/// assert_eq!(id.as_i64(), 42);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ::serde::Serialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::ParseIdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                $crate::types::id::parse_id(s).map(Self)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::deserialize_lenient(deserializer).map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(ProductId);
define_id!(OrderId);
define_id!(OrderDetailId);
define_id!(WarehouseId);
define_id!(SupplierId);
define_id!(TransferId);
define_id!(AlertId);
define_id!(FileId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_numbers_and_numeric_strings() {
        let a: WarehouseId = serde_json::from_str("7").unwrap();
        let b: WarehouseId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_i64(), 7);
    }

    #[test]
    fn test_rejects_garbage_strings() {
        assert!(serde_json::from_str::<ProductId>("\"abc\"").is_err());
        assert!(serde_json::from_str::<ProductId>("\"\"").is_err());
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&OrderId::new(15)).unwrap();
        assert_eq!(json, "15");
    }

    #[test]
    fn test_from_str_trims_and_requires_positive() {
        assert_eq!(" 12 ".parse::<SupplierId>().unwrap(), SupplierId::new(12));
        assert!("0".parse::<SupplierId>().is_err());
        assert!("-3".parse::<SupplierId>().is_err());
        assert!("".parse::<SupplierId>().is_err());
    }

    #[test]
    fn test_display_matches_inner_value() {
        assert_eq!(TransferId::new(99).to_string(), "99");
    }
}
