//! Report endpoints (`/reports/*`).

use depot_core::models::{InventorySummary, TopProductRow, WarehouseStockRow};
use tracing::instrument;

use super::{BackendClient, BackendError};

impl BackendClient {
    /// Headline inventory counters.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn report_summary(&self) -> Result<InventorySummary, BackendError> {
        self.get_json("reports/summary").await
    }

    /// Units and distinct products held per warehouse.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn stock_by_warehouse(&self) -> Result<Vec<WarehouseStockRow>, BackendError> {
        self.get_json("reports/stock-by-warehouse").await
    }

    /// Best-selling products, highest first.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn top_products(&self, limit: u32) -> Result<Vec<TopProductRow>, BackendError> {
        self.get_json_with("reports/top-products", &[("limit", limit.to_string())])
            .await
    }
}
