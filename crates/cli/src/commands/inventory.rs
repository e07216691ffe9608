//! `depot stock` and `depot adjust`.

use depot_admin::backend::BackendClient;
use depot_core::stock::{StockIndex, low_stock};
use depot_core::validation::{AdjustmentForm, validate_adjustment};
use depot_core::{ProductId, WarehouseId};

use super::CliError;
use crate::output;

/// Print stock rows, optionally only those at or below reorder level.
///
/// # Errors
///
/// Returns `CliError` if a backend read fails.
pub async fn stock(
    client: &BackendClient,
    warehouse: Option<WarehouseId>,
    low: bool,
    default_threshold: i64,
    json: bool,
) -> Result<(), CliError> {
    let (rows, products, warehouses) = tokio::try_join!(
        client.stock(warehouse),
        client.list_products(),
        client.list_warehouses(),
    )?;

    let warehouse_name = |id: WarehouseId| {
        warehouses
            .iter()
            .find(|w| w.id == id)
            .map_or_else(|| format!("#{id}"), |w| w.name.clone())
    };

    if low {
        let index = StockIndex::from_rows(&rows);
        let mut low_rows = low_stock(&products, &index, default_threshold);
        if let Some(only) = warehouse {
            low_rows.retain(|row| row.warehouse_id == Some(only));
        }
        if json {
            let values: Vec<_> = low_rows
                .iter()
                .map(|row| {
                    serde_json::json!({
                        "product_id": row.product.id,
                        "sku": row.product.sku,
                        "warehouse_id": row.warehouse_id,
                        "quantity": row.quantity,
                        "threshold": row.threshold,
                    })
                })
                .collect();
            return output::print_json(&values);
        }
        let table: Vec<Vec<String>> = low_rows
            .iter()
            .map(|row| {
                vec![
                    row.product.name.clone(),
                    row.product.sku.clone(),
                    row.warehouse_id
                        .map_or_else(|| "(none)".to_string(), warehouse_name),
                    row.quantity.to_string(),
                    row.threshold.to_string(),
                    row.shortfall().to_string(),
                ]
            })
            .collect();
        output::print_table(
            &["Product", "SKU", "Warehouse", "On hand", "Reorder at", "Short by"],
            &table,
            "Nothing at or below its reorder level.",
        );
        return Ok(());
    }

    if json {
        return output::print_json(&rows);
    }

    let mut table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let product = products.iter().find(|p| p.id == row.product_id);
            vec![
                row.product_name
                    .clone()
                    .or_else(|| product.map(|p| p.name.clone()))
                    .unwrap_or_else(|| format!("#{}", row.product_id)),
                product.map(|p| p.sku.clone()).unwrap_or_default(),
                row.warehouse_name
                    .clone()
                    .unwrap_or_else(|| warehouse_name(row.warehouse_id)),
                row.quantity.to_string(),
            ]
        })
        .collect();
    table.sort();
    output::print_table(
        &["Product", "SKU", "Warehouse", "On hand"],
        &table,
        "No stock recorded.",
    );
    Ok(())
}

/// Validate and send a stock adjustment.
///
/// # Errors
///
/// Returns `CliError::Invalid` if the change would drive stock negative,
/// or `CliError::Backend` if the backend rejects it.
pub async fn adjust(
    client: &BackendClient,
    product: ProductId,
    warehouse: WarehouseId,
    delta: i64,
    reason: Option<&str>,
) -> Result<(), CliError> {
    let rows = client.stock(Some(warehouse)).await?;
    let form = AdjustmentForm {
        product_id: product.to_string(),
        warehouse_id: warehouse.to_string(),
        delta: delta.to_string(),
        reason: reason.unwrap_or_default().to_string(),
    };
    let index = StockIndex::from_rows(&rows);
    let adjustment = validate_adjustment(&form, &index)?;

    client.adjust_stock(&adjustment).await?;
    tracing::info!(product_id = %product, warehouse_id = %warehouse, delta, "Stock adjusted");
    output::done(&format!(
        "Adjusted product {product} at warehouse {warehouse} by {delta:+} (now {})",
        index.quantity(product, warehouse).saturating_add(delta)
    ));
    Ok(())
}
