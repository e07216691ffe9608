//! Stock levels, adjustments, transfers and low-stock alerts.

use serde::{Deserialize, Serialize};

use super::{KeySpellings, lenient};
use crate::types::{AlertId, AlertStatus, ProductId, TransferId, TransferStatus, WarehouseId};

/// Quantity of one product held in one warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(default, alias = "Id", deserialize_with = "lenient::optional_id")]
    pub id: Option<i64>,
    #[serde(alias = "productId", alias = "pid")]
    pub product_id: ProductId,
    #[serde(alias = "warehouseId", alias = "wid")]
    pub warehouse_id: WarehouseId,
    #[serde(
        default,
        alias = "qty",
        alias = "stock",
        alias = "quantity_on_hand",
        alias = "quantityOnHand"
    )]
    pub quantity: i64,
    #[serde(
        default,
        alias = "productName",
        deserialize_with = "lenient::optional_text"
    )]
    pub product_name: Option<String>,
    #[serde(
        default,
        alias = "warehouseName",
        deserialize_with = "lenient::optional_text"
    )]
    pub warehouse_name: Option<String>,
}

impl KeySpellings for ProductDetail {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["id", "Id"],
        &["product_id", "productId", "pid"],
        &["warehouse_id", "warehouseId", "wid"],
        &["quantity", "qty", "stock", "quantity_on_hand", "quantityOnHand"],
        &["product_name", "productName"],
        &["warehouse_name", "warehouseName"],
    ];
}

/// Payload for a manual stock correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockAdjustment {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    /// Signed change applied to the current quantity.
    pub delta: i64,
    pub reason: Option<String>,
}

/// A movement of stock between two warehouses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTransfer {
    #[serde(alias = "Id", alias = "tid")]
    pub id: TransferId,
    #[serde(alias = "productId", alias = "pid")]
    pub product_id: ProductId,
    #[serde(alias = "fromWarehouseId", alias = "from_wid", alias = "source_warehouse_id")]
    pub from_warehouse_id: WarehouseId,
    #[serde(
        alias = "toWarehouseId",
        alias = "to_wid",
        alias = "destination_warehouse_id"
    )]
    pub to_warehouse_id: WarehouseId,
    #[serde(alias = "qty")]
    pub quantity: i64,
    #[serde(default)]
    pub status: TransferStatus,
    #[serde(
        default,
        alias = "notes",
        alias = "reason",
        deserialize_with = "lenient::optional_text"
    )]
    pub note: Option<String>,
    #[serde(
        default,
        alias = "createdAt",
        alias = "requested_at",
        alias = "requestedAt",
        deserialize_with = "lenient::optional_text"
    )]
    pub created_at: Option<String>,
}

impl KeySpellings for StockTransfer {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["id", "Id", "tid"],
        &["product_id", "productId", "pid"],
        &["from_warehouse_id", "fromWarehouseId", "from_wid", "source_warehouse_id"],
        &["to_warehouse_id", "toWarehouseId", "to_wid", "destination_warehouse_id"],
        &["quantity", "qty"],
        &["note", "notes", "reason"],
        &["created_at", "createdAt", "requested_at", "requestedAt"],
    ];
}

/// Payload for requesting a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewStockTransfer {
    pub product_id: ProductId,
    pub from_warehouse_id: WarehouseId,
    pub to_warehouse_id: WarehouseId,
    pub quantity: i64,
    pub note: Option<String>,
}

/// A server-raised notice that stock fell below its threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockAlert {
    #[serde(alias = "Id", alias = "aid")]
    pub id: AlertId,
    #[serde(alias = "productId", alias = "pid")]
    pub product_id: ProductId,
    #[serde(alias = "warehouseId", alias = "wid")]
    pub warehouse_id: WarehouseId,
    #[serde(
        default,
        alias = "current_quantity",
        alias = "currentQuantity",
        alias = "stock"
    )]
    pub quantity: i64,
    #[serde(
        default,
        alias = "min_quantity",
        alias = "minQuantity",
        alias = "reorder_level"
    )]
    pub threshold: i64,
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(
        default,
        alias = "createdAt",
        deserialize_with = "lenient::optional_text"
    )]
    pub created_at: Option<String>,
}

impl KeySpellings for LowStockAlert {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["id", "Id", "aid"],
        &["product_id", "productId", "pid"],
        &["warehouse_id", "warehouseId", "wid"],
        &["quantity", "current_quantity", "currentQuantity", "stock"],
        &["threshold", "min_quantity", "minQuantity", "reorder_level"],
        &["created_at", "createdAt"],
    ];
}

impl LowStockAlert {
    /// Units needed to get back to the threshold.
    #[must_use]
    pub const fn shortfall(&self) -> i64 {
        let missing = self.threshold.saturating_sub(self.quantity);
        if missing > 0 { missing } else { 0 }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_detail_accepts_every_warehouse_key() {
        for key in ["warehouse_id", "warehouseId", "wid"] {
            let json = format!(r#"{{"pid": 1, "{key}": 2, "qty": 30}}"#);
            let detail: ProductDetail = serde_json::from_str(&json).unwrap();
            assert_eq!(detail.warehouse_id, WarehouseId::new(2), "key {key}");
            assert_eq!(detail.quantity, 30);
        }
    }

    #[test]
    fn test_transfer_decodes_short_keys() {
        let transfer: StockTransfer = serde_json::from_str(
            r#"{"id": 4, "productId": 1, "from_wid": 2, "to_wid": "3", "quantity": 5, "status": "APPROVED"}"#,
        )
        .unwrap();
        assert_eq!(transfer.from_warehouse_id, WarehouseId::new(2));
        assert_eq!(transfer.to_warehouse_id, WarehouseId::new(3));
        assert_eq!(transfer.status, TransferStatus::Approved);
    }

    #[test]
    fn test_alert_shortfall_never_negative() {
        let mut alert: LowStockAlert = serde_json::from_str(
            r#"{"id": 1, "product_id": 1, "warehouse_id": 1, "currentQuantity": 3, "minQuantity": 10}"#,
        )
        .unwrap();
        assert_eq!(alert.status, AlertStatus::Open);
        assert_eq!(alert.shortfall(), 7);
        alert.quantity = 12;
        assert_eq!(alert.shortfall(), 0);
    }

    #[test]
    fn test_joined_stock_row_with_both_spellings_decodes() {
        let rows: Vec<ProductDetail> = crate::models::decode(
            br#"[{"product_id": 1, "pid": 1, "warehouse_id": 2, "wid": 2, "quantity": 3}]"#,
        )
        .unwrap();
        let row = rows.first().unwrap();
        assert_eq!(row.product_id, ProductId::new(1));
        assert_eq!(row.warehouse_id, WarehouseId::new(2));
        assert_eq!(row.quantity, 3);
    }

    #[test]
    fn test_transfer_and_alert_with_both_spellings_decode() {
        let transfer: StockTransfer = crate::models::decode(
            br#"{"id": 4, "tid": 4, "pid": 1, "productId": 1, "from_wid": 1,
                "from_warehouse_id": 1, "to_warehouse_id": 2, "qty": 5, "quantity": 5}"#,
        )
        .unwrap();
        assert_eq!(transfer.to_warehouse_id, WarehouseId::new(2));
        assert_eq!(transfer.quantity, 5);

        let alert: LowStockAlert = crate::models::decode(
            br#"{"id": 9, "Id": 9, "product_id": 1, "pid": 1, "wid": 2,
                "warehouse_id": 2, "stock": 1, "threshold": 4, "reorder_level": 4}"#,
        )
        .unwrap();
        assert_eq!(alert.shortfall(), 3);
    }
}
