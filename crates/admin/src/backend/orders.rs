//! Order endpoints (`/orders`, `/order-details`).

use depot_core::OrderId;
use depot_core::models::{
    KeySpellings, NewOrder, NewOrderDetail, NewOrderLine, Order, OrderDetail,
};
use reqwest::Method;
use serde::Deserialize;
use tracing::instrument;

use super::{BackendClient, BackendError};

/// Reply to a create call: only the new key is needed.
#[derive(Debug, Deserialize)]
struct Created {
    #[serde(alias = "Id", alias = "oid")]
    id: OrderId,
}

impl KeySpellings for Created {
    const SPELLINGS: &'static [&'static [&'static str]] = &[&["id", "Id", "oid"]];
}

impl BackendClient {
    /// List every order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, BackendError> {
        self.get_json("orders").await
    }

    /// Fetch one order header.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, BackendError> {
        self.get_json(&format!("orders/{id}")).await
    }

    /// Lines of one order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the body does not decode.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order_details(&self, id: OrderId) -> Result<Vec<OrderDetail>, BackendError> {
        self.get_json(&format!("orders/{id}/details")).await
    }

    /// Create an order header and return its ID.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend rejects the order or the reply
    /// carries no ID.
    #[instrument(skip(self, order), fields(order_type = %order.order_type))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<OrderId, BackendError> {
        let created: Created = self.send_json(Method::POST, "orders", order).await?;
        Ok(created.id)
    }

    /// Add one line to an existing order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend rejects the line.
    #[instrument(skip(self, detail), fields(order_id = %detail.order_id))]
    pub async fn create_order_detail(&self, detail: &NewOrderDetail) -> Result<(), BackendError> {
        self.send_json_unit(Method::POST, "order-details", detail)
            .await
    }

    /// Create an order and then each of its lines, one after another.
    ///
    /// Stops at the first failing line. The header cannot be rolled back, so
    /// that case is reported as [`BackendError::PartialOrder`].
    ///
    /// # Errors
    ///
    /// Returns the header error unchanged, or `PartialOrder` for a line error.
    #[instrument(skip(self, order, lines), fields(lines = lines.len()))]
    pub async fn create_order_with_details(
        &self,
        order: &NewOrder,
        lines: &[NewOrderLine],
    ) -> Result<OrderId, BackendError> {
        let order_id = self.create_order(order).await?;
        for (created, line) in lines.iter().enumerate() {
            if let Err(source) = self.create_order_detail(&line.for_order(order_id)).await {
                tracing::error!(%order_id, created, error = %source, "Order line creation failed");
                return Err(BackendError::PartialOrder {
                    order_id,
                    created,
                    total: lines.len(),
                    source: Box::new(source),
                });
            }
        }
        tracing::info!(%order_id, lines = lines.len(), "Order created");
        Ok(order_id)
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend refuses the deletion.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), BackendError> {
        self.delete(&format!("orders/{id}")).await
    }
}
