//! Status and kind enums for backend entities.
//!
//! The backend is not consistent about casing (`SALE`, `sale`, `Sale`), so
//! every enum here parses case-insensitively and always serializes to the
//! lowercase snake_case wire value.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    /// Enum being parsed.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => ($wire:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire value sent to the backend.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// Human-readable label for tables and dropdowns.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str() == wanted)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_owned(),
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

status_enum! {
    /// Role of a dashboard user.
    #[derive(Default)]
    UserRole as "user role" {
        /// Full access, including user management.
        Admin => ("admin", "Administrator"),
        /// Manages stock, orders and transfers.
        Manager => ("manager", "Manager"),
        /// Day-to-day warehouse staff.
        #[default]
        Staff => ("staff", "Staff"),
    }
}

status_enum! {
    /// Kind of order.
    #[derive(Default)]
    OrderType as "order type" {
        /// Goods sold to a customer.
        #[default]
        Sale => ("sale", "Sale"),
        /// Goods received from a supplier.
        Import => ("import", "Import"),
        /// Goods shipped out of a warehouse.
        Export => ("export", "Export"),
    }
}

impl OrderType {
    /// Whether the order takes stock out of its warehouse.
    #[must_use]
    pub const fn requires_stock(self) -> bool {
        matches!(self, Self::Sale | Self::Export)
    }

    /// Whether the order must name the supplier it came from.
    #[must_use]
    pub const fn requires_supplier(self) -> bool {
        matches!(self, Self::Import)
    }
}

status_enum! {
    /// Lifecycle of an order.
    #[derive(Default)]
    OrderStatus as "order status" {
        #[default]
        Pending => ("pending", "Pending"),
        Completed => ("completed", "Completed"),
        Cancelled => ("cancelled", "Cancelled"),
    }
}

status_enum! {
    /// Lifecycle of a stock transfer.
    #[derive(Default)]
    TransferStatus as "transfer status" {
        #[default]
        Pending => ("pending", "Pending"),
        Approved => ("approved", "Approved"),
        Rejected => ("rejected", "Rejected"),
        Completed => ("completed", "Completed"),
    }
}

impl TransferStatus {
    /// Whether the backend accepts moving a transfer from `self` to `next`.
    ///
    /// The dashboard uses this to decide which action buttons to show.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved | Self::Rejected) | (Self::Approved, Self::Completed)
        )
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }
}

status_enum! {
    /// State of a low-stock alert.
    #[derive(Default)]
    AlertStatus as "alert status" {
        #[default]
        Open => ("open", "Open"),
        Resolved => ("resolved", "Resolved"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_any_casing() {
        assert_eq!("SALE".parse::<OrderType>().unwrap(), OrderType::Sale);
        assert_eq!(" Import ".parse::<OrderType>().unwrap(), OrderType::Import);
        assert_eq!("export".parse::<OrderType>().unwrap(), OrderType::Export);
    }

    #[test]
    fn test_rejects_unknown_values() {
        let err = "teleport".parse::<OrderType>().unwrap_err();
        assert_eq!(err.kind, "order type");
        assert_eq!(err.to_string(), "unknown order type: \"teleport\"");
    }

    #[test]
    fn test_serde_uses_wire_values() {
        let json = serde_json::to_string(&TransferStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
        let parsed: TransferStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(parsed, TransferStatus::Completed);
    }

    #[test]
    fn test_order_type_stock_rules() {
        assert!(OrderType::Sale.requires_stock());
        assert!(OrderType::Export.requires_stock());
        assert!(!OrderType::Import.requires_stock());
        assert!(OrderType::Import.requires_supplier());
        assert!(!OrderType::Sale.requires_supplier());
    }

    #[test]
    fn test_transfer_transitions() {
        use TransferStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Completed));
        assert!(Approved.can_transition_to(Completed));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Completed.can_transition_to(Pending));
        assert!(Rejected.is_terminal());
        assert!(!Approved.is_terminal());
    }

    #[test]
    fn test_labels_and_all_are_consistent() {
        assert_eq!(UserRole::ALL.len(), 3);
        assert_eq!(UserRole::Admin.label(), "Administrator");
        assert_eq!(UserRole::default(), UserRole::Staff);
        assert_eq!(AlertStatus::ALL, &[AlertStatus::Open, AlertStatus::Resolved]);
    }
}
