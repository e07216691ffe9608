//! Orders and their line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{KeySpellings, lenient};
use crate::types::{
    OrderDetailId, OrderId, OrderStatus, OrderType, ProductId, SupplierId, WarehouseId,
    line_total,
};

/// An order header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(alias = "Id", alias = "oid")]
    pub id: OrderId,
    #[serde(alias = "type", alias = "orderType", alias = "kind")]
    pub order_type: OrderType,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(alias = "wid", alias = "warehouseId")]
    pub warehouse_id: WarehouseId,
    #[serde(
        default,
        alias = "supplierId",
        alias = "sid",
        deserialize_with = "lenient::optional_id"
    )]
    pub supplier_id: Option<SupplierId>,
    #[serde(
        default,
        alias = "customerName",
        alias = "customer",
        deserialize_with = "lenient::optional_text"
    )]
    pub customer_name: Option<String>,
    #[serde(
        default,
        alias = "notes",
        alias = "description",
        deserialize_with = "lenient::optional_text"
    )]
    pub note: Option<String>,
    #[serde(default, alias = "totalAmount", alias = "total_amount")]
    pub total: Option<Decimal>,
    #[serde(
        default,
        alias = "createdAt",
        alias = "orderDate",
        alias = "order_date",
        deserialize_with = "lenient::optional_text"
    )]
    pub created_at: Option<String>,
}

impl KeySpellings for Order {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["id", "Id", "oid"],
        &["order_type", "type", "orderType", "kind"],
        &["warehouse_id", "wid", "warehouseId"],
        &["supplier_id", "supplierId", "sid"],
        &["customer_name", "customerName", "customer"],
        &["note", "notes", "description"],
        &["total", "totalAmount", "total_amount"],
        &["created_at", "createdAt", "orderDate", "order_date"],
    ];
}

/// A single order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(
        default,
        alias = "Id",
        deserialize_with = "lenient::optional_id"
    )]
    pub id: Option<OrderDetailId>,
    #[serde(alias = "orderId", alias = "oid")]
    pub order_id: OrderId,
    #[serde(alias = "productId", alias = "pid")]
    pub product_id: ProductId,
    #[serde(alias = "qty")]
    pub quantity: i64,
    #[serde(default, alias = "unitPrice", alias = "price")]
    pub unit_price: Decimal,
}

impl KeySpellings for OrderDetail {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["id", "Id"],
        &["order_id", "orderId", "oid"],
        &["product_id", "productId", "pid"],
        &["quantity", "qty"],
        &["unit_price", "unitPrice", "price"],
    ];
}

impl OrderDetail {
    /// Quantity times unit price, `None` on overflow.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        line_total(self.quantity, self.unit_price)
    }
}

/// Payload for creating an order header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub order_type: OrderType,
    pub warehouse_id: WarehouseId,
    pub supplier_id: Option<SupplierId>,
    pub customer_name: Option<String>,
    pub note: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// A validated line waiting for its order to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl NewOrderLine {
    /// Attach the line to a created order.
    #[must_use]
    pub const fn for_order(&self, order_id: OrderId) -> NewOrderDetail {
        NewOrderDetail {
            order_id,
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

/// Payload for creating an order line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderDetail {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_order_accepts_mixed_keys() {
        let order: Order = serde_json::from_str(
            r#"{"Id": 9, "type": "IMPORT", "wid": "2", "supplierId": 3, "totalAmount": "120.00"}"#,
        )
        .unwrap();
        assert_eq!(order.id, OrderId::new(9));
        assert_eq!(order.order_type, OrderType::Import);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.warehouse_id, WarehouseId::new(2));
        assert_eq!(order.supplier_id, Some(SupplierId::new(3)));
        assert_eq!(order.total, Some(Decimal::from(120)));
    }

    #[test]
    fn test_detail_totals_lines() {
        let detail: OrderDetail = serde_json::from_str(
            r#"{"orderId": 9, "productId": 4, "qty": 3, "unitPrice": 1.5}"#,
        )
        .unwrap();
        assert_eq!(detail.id, None);
        assert_eq!(detail.total(), Some(Decimal::from_str("4.5").unwrap()));
    }

    #[test]
    fn test_line_attaches_to_order() {
        let line = NewOrderLine {
            product_id: ProductId::new(4),
            quantity: 2,
            unit_price: Decimal::from(3),
        };
        let detail = line.for_order(OrderId::new(11));
        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["order_id"], 11);
        assert_eq!(value["product_id"], 4);
        assert_eq!(value["unit_price"], serde_json::json!(3.0));
    }

    #[test]
    fn test_order_rows_with_repeated_spellings_decode() {
        let order: Order = crate::models::decode(
            br#"{"id": 7, "Id": 7, "type": "sale", "order_type": "sale",
                "warehouse_id": null, "wid": 2, "total": 10, "totalAmount": 10}"#,
        )
        .unwrap();
        assert_eq!(order.warehouse_id, WarehouseId::new(2));
        assert_eq!(order.total, Some(Decimal::from(10)));

        let details: Vec<OrderDetail> = crate::models::decode(
            br#"{"results": [{"order_id": 7, "oid": 7, "pid": 1, "product_id": 1,
                "qty": 2, "unit_price": 1.5, "price": 1.5}]}"#,
        )
        .unwrap();
        assert_eq!(
            details.first().unwrap().total(),
            Some(Decimal::from_str("3.0").unwrap())
        );
    }
}
