//! `depot transfer ...`.

use depot_admin::backend::BackendClient;
use depot_core::stock::StockIndex;
use depot_core::validation::{TransferForm, validate_transfer};
use depot_core::{ProductId, TransferId, WarehouseId};

use super::CliError;
use crate::output;

/// Arguments of `depot transfer create`.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub product: ProductId,
    pub from: WarehouseId,
    pub to: WarehouseId,
    pub quantity: i64,
    pub note: Option<String>,
}

impl From<&TransferRequest> for TransferForm {
    fn from(request: &TransferRequest) -> Self {
        Self {
            product_id: request.product.to_string(),
            from_warehouse_id: request.from.to_string(),
            to_warehouse_id: request.to.to_string(),
            quantity: request.quantity.to_string(),
            note: request.note.clone().unwrap_or_default(),
        }
    }
}

/// Print every transfer, newest first.
///
/// # Errors
///
/// Returns `CliError` if the backend read fails.
pub async fn list(client: &BackendClient, json: bool) -> Result<(), CliError> {
    let mut transfers = client.list_transfers().await?;
    transfers.sort_by(|a, b| b.id.cmp(&a.id));
    if json {
        return output::print_json(&transfers);
    }

    let rows: Vec<Vec<String>> = transfers
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.product_id.to_string(),
                t.from_warehouse_id.to_string(),
                t.to_warehouse_id.to_string(),
                t.quantity.to_string(),
                t.status.label().to_string(),
            ]
        })
        .collect();
    output::print_table(
        &["ID", "Product", "From", "To", "Qty", "Status"],
        &rows,
        "No transfers.",
    );
    Ok(())
}

/// Validate a transfer against source stock and send it.
///
/// # Errors
///
/// Returns `CliError::Invalid` for same-warehouse or over-stock requests.
pub async fn create(client: &BackendClient, request: &TransferRequest) -> Result<(), CliError> {
    let rows = client.stock(Some(request.from)).await?;
    let transfer = validate_transfer(&TransferForm::from(request), &StockIndex::from_rows(&rows))?;

    client.create_transfer(&transfer).await?;
    tracing::info!(
        product_id = %transfer.product_id,
        from = %transfer.from_warehouse_id,
        to = %transfer.to_warehouse_id,
        quantity = transfer.quantity,
        "Transfer requested"
    );
    output::done(&format!(
        "Requested {} of product {} from warehouse {} to {}",
        transfer.quantity, transfer.product_id, transfer.from_warehouse_id, transfer.to_warehouse_id
    ));
    Ok(())
}

/// # Errors
///
/// Returns `CliError::Backend` if the transfer is not pending.
pub async fn approve(client: &BackendClient, id: TransferId) -> Result<(), CliError> {
    client.approve_transfer(id).await?;
    output::done(&format!("Transfer {id} approved"));
    Ok(())
}

/// # Errors
///
/// Returns `CliError::Backend` if the transfer is not pending.
pub async fn reject(client: &BackendClient, id: TransferId) -> Result<(), CliError> {
    client.reject_transfer(id).await?;
    output::done(&format!("Transfer {id} rejected"));
    Ok(())
}

/// # Errors
///
/// Returns `CliError::Backend` if the transfer is not approved.
pub async fn complete(client: &BackendClient, id: TransferId) -> Result<(), CliError> {
    client.complete_transfer(id).await?;
    output::done(&format!("Transfer {id} completed"));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_maps_onto_form() {
        let request = TransferRequest {
            product: ProductId::new(7),
            from: WarehouseId::new(1),
            to: WarehouseId::new(1),
            quantity: 4,
            note: None,
        };
        let form = TransferForm::from(&request);
        assert_eq!(form.product_id, "7");
        assert_eq!(form.quantity, "4");
        assert!(form.note.is_empty());

        let errors = validate_transfer(&form, &StockIndex::default()).unwrap_err();
        assert!(errors.has("to_warehouse_id"));
        assert!(errors.has("quantity"));
    }
}
