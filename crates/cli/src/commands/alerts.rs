//! `depot alerts` and `depot alerts resolve`.

use depot_admin::backend::BackendClient;
use depot_core::AlertId;

use super::CliError;
use crate::output;

/// Print alerts, open ones only unless `all` is set.
///
/// # Errors
///
/// Returns `CliError` if the backend read fails.
pub async fn list(client: &BackendClient, all: bool, json: bool) -> Result<(), CliError> {
    let mut alerts = client.alerts(!all).await?;
    alerts.sort_by(|a, b| b.shortfall().cmp(&a.shortfall()).then(a.id.cmp(&b.id)));
    if json {
        return output::print_json(&alerts);
    }

    let rows: Vec<Vec<String>> = alerts
        .iter()
        .map(|alert| {
            vec![
                alert.id.to_string(),
                alert.product_id.to_string(),
                alert.warehouse_id.to_string(),
                alert.quantity.to_string(),
                alert.threshold.to_string(),
                alert.status.label().to_string(),
            ]
        })
        .collect();
    output::print_table(
        &["ID", "Product", "Warehouse", "On hand", "Threshold", "Status"],
        &rows,
        if all { "No alerts." } else { "No open alerts." },
    );
    Ok(())
}

/// # Errors
///
/// Returns `CliError::Backend` if the alert does not exist.
pub async fn resolve(client: &BackendClient, id: AlertId) -> Result<(), CliError> {
    client.resolve_alert(id).await?;
    output::done(&format!("Alert {id} resolved"));
    Ok(())
}
