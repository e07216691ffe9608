//! Aggregates served by the backend's reporting endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{KeySpellings, lenient};
use crate::types::{ProductId, WarehouseId};

/// Headline counts for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySummary {
    #[serde(alias = "productCount", alias = "total_products", alias = "totalProducts")]
    pub product_count: i64,
    #[serde(
        alias = "warehouseCount",
        alias = "total_warehouses",
        alias = "totalWarehouses"
    )]
    pub warehouse_count: i64,
    #[serde(
        alias = "supplierCount",
        alias = "total_suppliers",
        alias = "totalSuppliers"
    )]
    pub supplier_count: i64,
    #[serde(alias = "orderCount", alias = "total_orders", alias = "totalOrders")]
    pub order_count: i64,
    #[serde(
        alias = "pendingOrders",
        alias = "pending_order_count",
        alias = "pendingOrderCount"
    )]
    pub pending_orders: i64,
    #[serde(alias = "openAlerts", alias = "low_stock_count", alias = "lowStockCount")]
    pub open_alerts: i64,
    #[serde(alias = "totalUnits", alias = "total_stock", alias = "totalStock")]
    pub total_units: i64,
    #[serde(alias = "stockValue", alias = "inventory_value", alias = "inventoryValue")]
    pub stock_value: Decimal,
}

impl KeySpellings for InventorySummary {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["product_count", "productCount", "total_products", "totalProducts"],
        &["warehouse_count", "warehouseCount", "total_warehouses", "totalWarehouses"],
        &["supplier_count", "supplierCount", "total_suppliers", "totalSuppliers"],
        &["order_count", "orderCount", "total_orders", "totalOrders"],
        &["pending_orders", "pendingOrders", "pending_order_count", "pendingOrderCount"],
        &["open_alerts", "openAlerts", "low_stock_count", "lowStockCount"],
        &["total_units", "totalUnits", "total_stock", "totalStock"],
        &["stock_value", "stockValue", "inventory_value", "inventoryValue"],
    ];
}

/// Units held per warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseStockRow {
    #[serde(alias = "warehouseId", alias = "wid", alias = "id")]
    pub warehouse_id: WarehouseId,
    #[serde(
        default,
        alias = "warehouseName",
        alias = "name",
        deserialize_with = "lenient::optional_text"
    )]
    pub warehouse_name: Option<String>,
    #[serde(default, alias = "productCount", alias = "products")]
    pub product_count: i64,
    #[serde(
        default,
        alias = "totalUnits",
        alias = "total_quantity",
        alias = "totalQuantity",
        alias = "quantity"
    )]
    pub total_units: i64,
}

impl KeySpellings for WarehouseStockRow {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["warehouse_id", "warehouseId", "wid", "id"],
        &["warehouse_name", "warehouseName", "name"],
        &["product_count", "productCount", "products"],
        &["total_units", "totalUnits", "total_quantity", "totalQuantity", "quantity"],
    ];
}

/// Best-selling products by units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopProductRow {
    #[serde(alias = "productId", alias = "pid", alias = "id")]
    pub product_id: ProductId,
    #[serde(
        default,
        alias = "productName",
        alias = "name",
        deserialize_with = "lenient::optional_text"
    )]
    pub product_name: Option<String>,
    #[serde(
        default,
        alias = "unitsSold",
        alias = "total_quantity",
        alias = "totalQuantity",
        alias = "quantity"
    )]
    pub units_sold: i64,
    #[serde(default, alias = "totalRevenue", alias = "total_revenue")]
    pub revenue: Decimal,
}

impl KeySpellings for TopProductRow {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["product_id", "productId", "pid", "id"],
        &["product_name", "productName", "name"],
        &["units_sold", "unitsSold", "total_quantity", "totalQuantity", "quantity"],
        &["revenue", "totalRevenue", "total_revenue"],
    ];
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_tolerates_missing_fields() {
        let summary: InventorySummary =
            serde_json::from_str(r#"{"totalProducts": 12, "stockValue": "1500.50"}"#).unwrap();
        assert_eq!(summary.product_count, 12);
        assert_eq!(summary.warehouse_count, 0);
        assert_eq!(summary.stock_value, Decimal::new(150_050, 2));
    }

    #[test]
    fn test_top_products_accept_camel_case() {
        let rows: Vec<TopProductRow> = serde_json::from_str(
            r#"[{"productId": 3, "productName": "Bolt", "totalQuantity": 40, "revenue": 4}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].product_id, ProductId::new(3));
        assert_eq!(rows[0].units_sold, 40);
        assert_eq!(rows[0].revenue, Decimal::from(4));
    }

    #[test]
    fn test_report_rows_with_repeated_spellings_decode() {
        let summary: InventorySummary = crate::models::decode(
            br#"{"total_products": 3, "product_count": 3, "stockValue": 5, "stock_value": 5}"#,
        )
        .unwrap();
        assert_eq!(summary.product_count, 3);
        assert_eq!(summary.stock_value, Decimal::from(5));

        let rows: Vec<WarehouseStockRow> = crate::models::decode(
            br#"[{"id": 1, "warehouse_id": 1, "name": "North", "warehouse_name": "North",
                "quantity": 4, "total_units": 4}]"#,
        )
        .unwrap();
        assert_eq!(rows.first().unwrap().total_units, 4);

        let top: Vec<TopProductRow> = crate::models::decode(
            br#"[{"id": 2, "product_id": 2, "quantity": 9, "units_sold": 9}]"#,
        )
        .unwrap();
        assert_eq!(top.first().unwrap().units_sold, 9);
    }
}
