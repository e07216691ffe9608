//! `depot report summary|warehouses|top`.

use depot_admin::backend::BackendClient;
use depot_core::format_money;

use super::CliError;
use crate::output;

/// # Errors
///
/// Returns `CliError` if the backend read fails.
pub async fn summary(client: &BackendClient, json: bool) -> Result<(), CliError> {
    let summary = client.report_summary().await?;
    if json {
        return output::print_json(&summary);
    }

    let rows = vec![
        vec!["Products".to_string(), summary.product_count.to_string()],
        vec!["Warehouses".to_string(), summary.warehouse_count.to_string()],
        vec!["Suppliers".to_string(), summary.supplier_count.to_string()],
        vec!["Orders".to_string(), summary.order_count.to_string()],
        vec!["Pending orders".to_string(), summary.pending_orders.to_string()],
        vec!["Open alerts".to_string(), summary.open_alerts.to_string()],
        vec!["Units in stock".to_string(), summary.total_units.to_string()],
        vec!["Stock value".to_string(), format_money(summary.stock_value)],
    ];
    output::print_table(&["Metric", "Value"], &rows, "");
    Ok(())
}

/// # Errors
///
/// Returns `CliError` if the backend read fails.
pub async fn warehouses(client: &BackendClient, json: bool) -> Result<(), CliError> {
    let mut rows = client.stock_by_warehouse().await?;
    rows.sort_by(|a, b| b.total_units.cmp(&a.total_units));
    if json {
        return output::print_json(&rows);
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.warehouse_name
                    .clone()
                    .unwrap_or_else(|| format!("#{}", row.warehouse_id)),
                row.product_count.to_string(),
                row.total_units.to_string(),
            ]
        })
        .collect();
    output::print_table(&["Warehouse", "Products", "Units"], &table, "No stock recorded.");
    Ok(())
}

/// # Errors
///
/// Returns `CliError` if the backend read fails.
pub async fn top(client: &BackendClient, limit: u32, json: bool) -> Result<(), CliError> {
    let rows = client.top_products(limit.max(1)).await?;
    if json {
        return output::print_json(&rows);
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            vec![
                (i + 1).to_string(),
                row.product_name
                    .clone()
                    .unwrap_or_else(|| format!("#{}", row.product_id)),
                row.units_sold.to_string(),
                format_money(row.revenue),
            ]
        })
        .collect();
    output::print_table(&["#", "Product", "Units", "Revenue"], &table, "No sales recorded.");
    Ok(())
}
