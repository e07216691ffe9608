//! Stock lookups derived from the backend's stock-by-warehouse rows.
//!
//! The backend owns stock levels; everything here is a read-only view used
//! to filter dropdowns (which warehouses can fulfil an order), pre-check
//! forms and list products running low.

use std::collections::{BTreeMap, HashMap};

use crate::models::{Product, ProductDetail, Warehouse};
use crate::types::{OrderType, ProductId, WarehouseId};

/// Quantities keyed by `(product, warehouse)`.
///
/// Duplicate rows for the same pair are summed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockIndex {
    quantities: HashMap<(ProductId, WarehouseId), i64>,
}

impl StockIndex {
    /// Build an index from stock rows.
    #[must_use]
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a ProductDetail>) -> Self {
        let mut quantities = HashMap::new();
        for row in rows {
            let total = quantities
                .entry((row.product_id, row.warehouse_id))
                .or_insert(0_i64);
            *total = total.saturating_add(row.quantity);
        }
        Self { quantities }
    }

    /// Quantity of `product` held in `warehouse`, zero when unknown.
    #[must_use]
    pub fn quantity(&self, product: ProductId, warehouse: WarehouseId) -> i64 {
        self.quantities
            .get(&(product, warehouse))
            .copied()
            .unwrap_or(0)
    }

    /// Units of `product` across every warehouse.
    #[must_use]
    pub fn total_for_product(&self, product: ProductId) -> i64 {
        self.quantities
            .iter()
            .filter(|((p, _), _)| *p == product)
            .fold(0, |sum, (_, qty)| sum.saturating_add(*qty))
    }

    /// Units of every product held in `warehouse`.
    #[must_use]
    pub fn total_for_warehouse(&self, warehouse: WarehouseId) -> i64 {
        self.quantities
            .iter()
            .filter(|((_, w), _)| *w == warehouse)
            .fold(0, |sum, (_, qty)| sum.saturating_add(*qty))
    }

    /// Warehouses holding a row for `product`, ordered by warehouse ID.
    #[must_use]
    pub fn warehouses_for_product(&self, product: ProductId) -> Vec<(WarehouseId, i64)> {
        let mut rows: Vec<_> = self
            .quantities
            .iter()
            .filter(|((p, _), _)| *p == product)
            .map(|((_, w), qty)| (*w, *qty))
            .collect();
        rows.sort_unstable_by_key(|(w, _)| *w);
        rows
    }

    /// Every `(product, warehouse, quantity)` entry, ordered by IDs.
    #[must_use]
    pub fn entries(&self) -> Vec<(ProductId, WarehouseId, i64)> {
        let mut rows: Vec<_> = self
            .quantities
            .iter()
            .map(|((p, w), qty)| (*p, *w, *qty))
            .collect();
        rows.sort_unstable();
        rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

impl<'a> FromIterator<&'a ProductDetail> for StockIndex {
    fn from_iter<I: IntoIterator<Item = &'a ProductDetail>>(iter: I) -> Self {
        Self::from_rows(iter)
    }
}

/// Sum requested quantities per product, skipping lines without a product.
#[must_use]
pub fn requested_totals(
    lines: impl IntoIterator<Item = (Option<ProductId>, i64)>,
) -> BTreeMap<ProductId, i64> {
    let mut totals = BTreeMap::new();
    for (product, quantity) in lines {
        if let Some(product) = product {
            let total = totals.entry(product).or_insert(0_i64);
            *total = total.saturating_add(quantity.max(0));
        }
    }
    totals
}

/// Warehouses able to fulfil every line of an order.
///
/// Imports bring stock in, so every warehouse qualifies. For sales and
/// exports a warehouse qualifies when it holds at least the summed quantity
/// of each selected product. The input order is preserved.
#[must_use]
pub fn compatible_warehouses<'a>(
    warehouses: &'a [Warehouse],
    index: &StockIndex,
    order_type: OrderType,
    lines: impl IntoIterator<Item = (Option<ProductId>, i64)>,
) -> Vec<&'a Warehouse> {
    if !order_type.requires_stock() {
        return warehouses.iter().collect();
    }
    let requested = requested_totals(lines);
    warehouses
        .iter()
        .filter(|warehouse| {
            requested
                .iter()
                .all(|(product, qty)| index.quantity(*product, warehouse.id) >= *qty)
        })
        .collect()
}

/// A product/warehouse pair at or below its threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct LowStockRow<'a> {
    pub product: &'a Product,
    /// `None` when the product has no stock row anywhere.
    pub warehouse_id: Option<WarehouseId>,
    pub quantity: i64,
    pub threshold: i64,
}

impl LowStockRow<'_> {
    /// Units missing to get back to the threshold.
    #[must_use]
    pub const fn shortfall(&self) -> i64 {
        self.threshold.saturating_sub(self.quantity)
    }
}

/// Rows whose quantity is at or below the product's reorder level, or
/// `default_threshold` when the product has none. Largest shortfall first.
#[must_use]
pub fn low_stock<'a>(
    products: &'a [Product],
    index: &StockIndex,
    default_threshold: i64,
) -> Vec<LowStockRow<'a>> {
    let mut rows = Vec::new();
    for product in products {
        let threshold = product.reorder_level.unwrap_or(default_threshold);
        let held = index.warehouses_for_product(product.id);
        if held.is_empty() {
            if threshold >= 0 {
                rows.push(LowStockRow {
                    product,
                    warehouse_id: None,
                    quantity: 0,
                    threshold,
                });
            }
            continue;
        }
        rows.extend(
            held.into_iter()
                .filter(|(_, qty)| *qty <= threshold)
                .map(|(warehouse_id, quantity)| LowStockRow {
                    product,
                    warehouse_id: Some(warehouse_id),
                    quantity,
                    threshold,
                }),
        );
    }
    rows.sort_by(|a, b| {
        b.shortfall()
            .cmp(&a.shortfall())
            .then_with(|| a.product.name.cmp(&b.product.name))
    });
    rows
}

/// Products whose name or SKU contains `query`, ignoring case.
///
/// A blank query matches everything.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.sku.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn row(product: i64, warehouse: i64, quantity: i64) -> ProductDetail {
        ProductDetail {
            id: None,
            product_id: ProductId::new(product),
            warehouse_id: WarehouseId::new(warehouse),
            quantity,
            product_name: None,
            warehouse_name: None,
        }
    }

    fn warehouse(id: i64, name: &str) -> Warehouse {
        Warehouse {
            id: WarehouseId::new(id),
            name: name.to_owned(),
            address: None,
            capacity: None,
            manager: None,
        }
    }

    fn product(id: i64, name: &str, sku: &str, reorder_level: Option<i64>) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            sku: sku.to_owned(),
            description: None,
            unit: None,
            price: Decimal::ONE,
            supplier_id: None,
            reorder_level,
        }
    }

    fn ids(warehouses: &[&Warehouse]) -> Vec<i64> {
        warehouses.iter().map(|w| w.id.as_i64()).collect()
    }

    #[test]
    fn test_index_sums_duplicate_rows() {
        let rows = [row(1, 1, 5), row(1, 1, 3), row(1, 2, 4), row(2, 1, 7)];
        let index: StockIndex = rows.iter().collect();
        assert_eq!(index.quantity(ProductId::new(1), WarehouseId::new(1)), 8);
        assert_eq!(index.quantity(ProductId::new(2), WarehouseId::new(2)), 0);
        assert_eq!(index.total_for_product(ProductId::new(1)), 12);
        assert_eq!(index.total_for_warehouse(WarehouseId::new(1)), 15);
        assert_eq!(
            index.warehouses_for_product(ProductId::new(1)),
            vec![(WarehouseId::new(1), 8), (WarehouseId::new(2), 4)]
        );
    }

    #[test]
    fn test_imports_accept_every_warehouse() {
        let warehouses = [warehouse(2, "B"), warehouse(1, "A")];
        let index = StockIndex::default();
        let lines = [(Some(ProductId::new(1)), 100)];
        let found = compatible_warehouses(&warehouses, &index, OrderType::Import, lines);
        assert_eq!(ids(&found), vec![2, 1]);
    }

    #[test]
    fn test_sales_need_enough_of_every_product() {
        let warehouses = [warehouse(1, "A"), warehouse(2, "B"), warehouse(3, "C")];
        let rows = [row(1, 1, 10), row(2, 1, 1), row(1, 2, 10), row(2, 2, 5), row(1, 3, 2)];
        let index = StockIndex::from_rows(&rows);
        let lines = [(Some(ProductId::new(1)), 5), (Some(ProductId::new(2)), 3)];
        let found = compatible_warehouses(&warehouses, &index, OrderType::Sale, lines);
        assert_eq!(ids(&found), vec![2]);
    }

    #[test]
    fn test_duplicate_lines_are_summed() {
        let warehouses = [warehouse(1, "A"), warehouse(2, "B")];
        let index = StockIndex::from_rows(&[row(1, 1, 6), row(1, 2, 10)]);
        let lines = [(Some(ProductId::new(1)), 4), (Some(ProductId::new(1)), 4)];
        let found = compatible_warehouses(&warehouses, &index, OrderType::Export, lines);
        assert_eq!(ids(&found), vec![2]);
    }

    #[test]
    fn test_lines_without_products_are_ignored() {
        let warehouses = [warehouse(1, "A"), warehouse(2, "B")];
        let index = StockIndex::default();
        let found = compatible_warehouses(&warehouses, &index, OrderType::Sale, [(None, 5)]);
        assert_eq!(ids(&found), vec![1, 2]);
        let found = compatible_warehouses(&warehouses, &index, OrderType::Sale, []);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_low_stock_uses_reorder_level_then_default() {
        let products = [
            product(1, "Bolt", "B-1", Some(20)),
            product(2, "Nut", "N-1", None),
            product(3, "Washer", "W-1", None),
        ];
        let index = StockIndex::from_rows(&[row(1, 1, 15), row(1, 2, 50), row(2, 1, 10)]);
        let rows = low_stock(&products, &index, 10);

        let summary: Vec<_> = rows
            .iter()
            .map(|r| (r.product.id.as_i64(), r.warehouse_id.map(|w| w.as_i64()), r.shortfall()))
            .collect();
        assert_eq!(summary, vec![(3, None, 10), (1, Some(1), 5), (2, Some(1), 0)]);
    }

    #[test]
    fn test_filters_by_name_or_sku() {
        let products = [
            product(1, "Steel Bolt", "SB-10", None),
            product(2, "Nut", "N-1", None),
        ];
        assert_eq!(filter_products(&products, "bolt").len(), 1);
        assert_eq!(filter_products(&products, "n-1")[0].name, "Nut");
        assert_eq!(filter_products(&products, "  ").len(), 2);
        assert!(filter_products(&products, "gear").is_empty());
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let index = StockIndex::from_rows(&[row(1, 1, i64::MAX), row(1, 1, 5), row(1, 2, 1)]);
        assert_eq!(index.quantity(ProductId::new(1), WarehouseId::new(1)), i64::MAX);
        assert_eq!(index.total_for_product(ProductId::new(1)), i64::MAX);

        let requested = requested_totals([
            (Some(ProductId::new(1)), i64::MAX),
            (Some(ProductId::new(1)), i64::MAX),
        ]);
        assert_eq!(requested.get(&ProductId::new(1)), Some(&i64::MAX));
    }
}
