//! Backend entity DTOs and request payloads.
//!
//! # Normalization
//!
//! The backend is loose about key names (`id`/`Id`, `wid`/`warehouse_id`/
//! `warehouseId`, ...), ID encodings and response envelopes. All of that is
//! absorbed here through serde aliases and lenient decoders so the rest of
//! the workspace sees one canonical shape.
//!
//! Joined rows sometimes carry two spellings of one field at once. Serde
//! rejects those as duplicates, so backend replies go through [`decode`],
//! which keeps the first non-null spelling listed in [`KeySpellings`].
//!
//! Request payloads (`New*`, `*Input`, `*Update`) always serialize as
//! snake_case JSON with money as JSON numbers.

pub mod catalog;
pub mod file;
pub mod inventory;
pub mod order;
pub mod report;
pub mod user;

pub use catalog::{Product, ProductInput, Supplier, SupplierInput, Warehouse, WarehouseInput};
pub use file::FileRecord;
pub use inventory::{LowStockAlert, NewStockTransfer, ProductDetail, StockAdjustment, StockTransfer};
pub use order::{NewOrder, NewOrderDetail, NewOrderLine, Order, OrderDetail};
pub use report::{InventorySummary, TopProductRow, WarehouseStockRow};
pub use user::{NewUser, User, UserUpdate};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Keys a backend entity's fields may arrive under.
pub trait KeySpellings {
    /// One group per field, canonical key first.
    const SPELLINGS: &'static [&'static [&'static str]];
}

impl<T: KeySpellings> KeySpellings for Vec<T> {
    const SPELLINGS: &'static [&'static [&'static str]] = T::SPELLINGS;
}

/// Decode a backend reply, bare or enveloped.
///
/// Where a record carries several spellings of one field, the first
/// non-null one in [`KeySpellings::SPELLINGS`] order wins.
///
/// # Errors
///
/// Returns the `serde_json` error when the body is not JSON or does not
/// match `T`.
pub fn decode<T>(bytes: &[u8]) -> serde_json::Result<T>
where
    T: DeserializeOwned + KeySpellings,
{
    let mut value: Value = serde_json::from_slice(bytes)?;
    if let Value::Object(map) = &mut value {
        for key in ["data", "items", "results"] {
            if let Some(inner) = map.get_mut(key) {
                first_wins(inner, T::SPELLINGS);
            }
        }
    }
    first_wins(&mut value, T::SPELLINGS);
    serde_json::from_value::<Envelope<T>>(value).map(Envelope::into_inner)
}

fn first_wins(value: &mut Value, spellings: &[&[&str]]) {
    match value {
        Value::Array(items) => {
            for item in items {
                first_wins(item, spellings);
            }
        }
        Value::Object(map) => {
            for group in spellings {
                let keep = group
                    .iter()
                    .find(|key| map.get(**key).is_some_and(|v| !v.is_null()))
                    .or_else(|| group.iter().find(|key| map.contains_key(**key)))
                    .copied();
                if let Some(keep) = keep {
                    for key in group.iter().filter(|key| **key != keep) {
                        map.remove(*key);
                    }
                }
            }
        }
        _ => {}
    }
}

/// A payload that may arrive bare or wrapped in `{"data": ...}`.
///
/// ```
/// use depot_core::models::Envelope;
///
/// let bare: Envelope<Vec<i32>> = serde_json::from_str("[1, 2]").unwrap();
/// let wrapped: Envelope<Vec<i32>> = serde_json::from_str(r#"{"data": [1, 2]}"#).unwrap();
/// assert_eq!(bare.into_inner(), wrapped.into_inner());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    /// `{"data": ...}` (also `items` / `results`).
    Wrapped {
        #[serde(alias = "items", alias = "results")]
        data: T,
    },
    /// The payload itself.
    Bare(T),
}

impl<T> Envelope<T> {
    /// Unwrap the payload regardless of shape.
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Lenient serde helpers shared by the entity modules.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    use crate::types::id::parse_id;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    /// Optional foreign key: `null`, `""` and `0` all mean "none".
    pub fn optional_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: From<i64>,
    {
        match Option::<RawId>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawId::Int(id)) => Ok((id > 0).then(|| T::from(id))),
            Some(RawId::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(RawId::Text(text)) => parse_id(&text)
                .map(|id| Some(T::from(id)))
                .map_err(serde::de::Error::custom),
        }
    }

    /// Optional text where an empty string means "none".
    pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty()))
    }

    pub const fn default_true() -> bool {
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_accepts_bare_and_wrapped_lists() {
        let bare: Envelope<Vec<Warehouse>> =
            serde_json::from_str(r#"[{"id": 1, "name": "North"}]"#).unwrap();
        let wrapped: Envelope<Vec<Warehouse>> =
            serde_json::from_str(r#"{"data": [{"Id": 1, "name": "North"}]}"#).unwrap();
        let items: Envelope<Vec<Warehouse>> =
            serde_json::from_str(r#"{"items": [{"wid": "1", "name": "North"}], "total": 1}"#)
                .unwrap();

        let bare = bare.into_inner();
        assert_eq!(bare, wrapped.into_inner());
        assert_eq!(bare, items.into_inner());
    }

    #[test]
    fn test_envelope_accepts_empty_list() {
        let empty: Envelope<Vec<Warehouse>> = serde_json::from_str("[]").unwrap();
        assert!(empty.into_inner().is_empty());
    }

    #[test]
    fn test_envelope_accepts_single_records() {
        let wrapped: Envelope<Product> = serde_json::from_str(
            r#"{"data": {"id": 3, "name": "Bolt", "sku": "B-3", "price": "0.10"}}"#,
        )
        .unwrap();
        assert_eq!(wrapped.into_inner().name, "Bolt");
    }

    #[test]
    fn test_decode_prefers_first_non_null_spelling() {
        let rows: Vec<ProductDetail> = decode(
            br#"{"items": [{"product_id": 1, "warehouse_id": null, "wid": 4, "qty": 2}]}"#,
        )
        .unwrap();
        assert_eq!(rows.first().unwrap().warehouse_id, crate::WarehouseId::new(4));
    }

    #[test]
    fn test_plain_serde_still_rejects_duplicates() {
        let direct = serde_json::from_str::<Product>(
            r#"{"id": 1, "Id": 1, "name": "Tape", "price": 1}"#,
        );
        assert!(direct.is_err());

        let decoded: Product =
            decode(br#"{"id": 1, "Id": 1, "name": "Tape", "price": 1}"#).unwrap();
        assert_eq!(decoded.name, "Tape");
    }
}
