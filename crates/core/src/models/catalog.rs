//! Products, warehouses and suppliers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{KeySpellings, lenient};
use crate::types::{ProductId, SupplierId, WarehouseId};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(alias = "Id", alias = "pid")]
    pub id: ProductId,
    #[serde(alias = "productName", alias = "product_name")]
    pub name: String,
    #[serde(default, alias = "SKU", alias = "code")]
    pub sku: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub unit: Option<String>,
    #[serde(default, alias = "unitPrice", alias = "unit_price")]
    pub price: Decimal,
    #[serde(
        default,
        alias = "supplierId",
        alias = "sid",
        deserialize_with = "lenient::optional_id"
    )]
    pub supplier_id: Option<SupplierId>,
    /// Low-stock threshold for this product, when the backend tracks one.
    #[serde(
        default,
        alias = "reorderLevel",
        alias = "min_stock",
        alias = "minStock"
    )]
    pub reorder_level: Option<i64>,
}

impl KeySpellings for Product {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["id", "Id", "pid"],
        &["name", "productName", "product_name"],
        &["sku", "SKU", "code"],
        &["price", "unitPrice", "unit_price"],
        &["supplier_id", "supplierId", "sid"],
        &["reorder_level", "reorderLevel", "min_stock", "minStock"],
    ];
}

impl Product {
    /// `Name (SKU)` label used in dropdowns.
    #[must_use]
    pub fn label(&self) -> String {
        if self.sku.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.sku)
        }
    }
}

/// Create/update payload for a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInput {
    pub name: String,
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub supplier_id: Option<SupplierId>,
    pub reorder_level: Option<i64>,
}

/// A storage location holding stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    #[serde(alias = "Id", alias = "wid")]
    pub id: WarehouseId,
    #[serde(alias = "warehouseName", alias = "warehouse_name")]
    pub name: String,
    #[serde(
        default,
        alias = "location",
        deserialize_with = "lenient::optional_text"
    )]
    pub address: Option<String>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(
        default,
        alias = "managerName",
        alias = "manager_name",
        deserialize_with = "lenient::optional_text"
    )]
    pub manager: Option<String>,
}

impl KeySpellings for Warehouse {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["id", "Id", "wid"],
        &["name", "warehouseName", "warehouse_name"],
        &["address", "location"],
        &["manager", "managerName", "manager_name"],
    ];
}

/// Create/update payload for a warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseInput {
    pub name: String,
    pub address: Option<String>,
    pub capacity: Option<i64>,
    pub manager: Option<String>,
}

/// A supplier goods are imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(alias = "Id", alias = "sid")]
    pub id: SupplierId,
    #[serde(alias = "supplierName", alias = "supplier_name")]
    pub name: String,
    #[serde(
        default,
        alias = "contactName",
        alias = "contact",
        deserialize_with = "lenient::optional_text"
    )]
    pub contact_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub email: Option<String>,
    #[serde(
        default,
        alias = "phoneNumber",
        alias = "phone_number",
        deserialize_with = "lenient::optional_text"
    )]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub address: Option<String>,
}

impl KeySpellings for Supplier {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["id", "Id", "sid"],
        &["name", "supplierName", "supplier_name"],
        &["contact_name", "contactName", "contact"],
        &["phone", "phoneNumber", "phone_number"],
    ];
}

/// Create/update payload for a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplierInput {
    pub name: String,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
