//! Stock levels, adjustments, low-stock alerts and stock transfers.

use depot_core::models::{
    LowStockAlert, NewStockTransfer, ProductDetail, StockAdjustment, StockTransfer,
};
use depot_core::{AlertId, TransferId, TransferStatus, WarehouseId};
use reqwest::Method;
use tracing::instrument;

use super::{BackendClient, BackendError};

impl BackendClient {
    /// Stock-by-warehouse rows, optionally for one warehouse only.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn stock(
        &self,
        warehouse: Option<WarehouseId>,
    ) -> Result<Vec<ProductDetail>, BackendError> {
        match warehouse {
            Some(id) => {
                self.get_json_with("inventory/stock", &[("warehouse_id", id.to_string())])
                    .await
            }
            None => self.get_json("inventory/stock").await,
        }
    }

    /// Apply a manual stock correction.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend rejects the adjustment.
    #[instrument(skip(self), fields(product_id = %adjustment.product_id, warehouse_id = %adjustment.warehouse_id))]
    pub async fn adjust_stock(&self, adjustment: &StockAdjustment) -> Result<(), BackendError> {
        self.send_json_unit(Method::POST, "inventory/adjust", adjustment)
            .await
    }

    /// Low-stock alerts; `open_only` limits the list to unresolved ones.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn alerts(&self, open_only: bool) -> Result<Vec<LowStockAlert>, BackendError> {
        if open_only {
            self.get_json_with("inventory/alerts", &[("status", "open".to_owned())])
                .await
        } else {
            self.get_json("inventory/alerts").await
        }
    }

    /// Mark an alert as resolved.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend refuses.
    #[instrument(skip(self), fields(alert_id = %id))]
    pub async fn resolve_alert(&self, id: AlertId) -> Result<(), BackendError> {
        self.post_empty(&format!("inventory/alerts/{id}/resolve"))
            .await
    }

    /// List stock transfers.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn list_transfers(&self) -> Result<Vec<StockTransfer>, BackendError> {
        self.get_json("stock-transfers").await
    }

    /// Request a transfer between two warehouses.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend rejects the transfer.
    #[instrument(skip(self, transfer), fields(product_id = %transfer.product_id, quantity = transfer.quantity))]
    pub async fn create_transfer(&self, transfer: &NewStockTransfer) -> Result<(), BackendError> {
        self.send_json_unit(Method::POST, "stock-transfers", transfer)
            .await
    }

    /// Approve a pending transfer.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend refuses the transition.
    pub async fn approve_transfer(&self, id: TransferId) -> Result<(), BackendError> {
        self.transition_transfer(id, TransferStatus::Approved).await
    }

    /// Reject a pending transfer.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend refuses the transition.
    pub async fn reject_transfer(&self, id: TransferId) -> Result<(), BackendError> {
        self.transition_transfer(id, TransferStatus::Rejected).await
    }

    /// Complete an approved transfer, moving the stock.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend refuses the transition.
    pub async fn complete_transfer(&self, id: TransferId) -> Result<(), BackendError> {
        self.transition_transfer(id, TransferStatus::Completed).await
    }

    #[instrument(skip(self), fields(transfer_id = %id, to = %target))]
    async fn transition_transfer(
        &self,
        id: TransferId,
        target: TransferStatus,
    ) -> Result<(), BackendError> {
        let action = match target {
            TransferStatus::Approved => "approve",
            TransferStatus::Rejected => "reject",
            TransferStatus::Completed => "complete",
            TransferStatus::Pending => {
                return Err(BackendError::Api {
                    status: 400,
                    message: "A transfer cannot be moved back to pending".to_owned(),
                });
            }
        };
        self.post_empty(&format!("stock-transfers/{id}/{action}"))
            .await
    }
}
