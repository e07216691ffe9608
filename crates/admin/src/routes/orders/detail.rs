//! Order detail page and deletion.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Redirect, Response},
};
use depot_core::models::{Order, OrderDetail};
use depot_core::{OrderId, format_money, order_total};
use tower_sessions::Session;
use tracing::instrument;

use super::super::{Names, loaded, render};
use super::{status_class, type_class};
use crate::{error::AppError, filters, state::AppState, toast, toast::Toast};

/// Shown in place of an amount too large to represent.
const OVERFLOW: &str = "too large";

/// One order line with resolved product name.
#[derive(Debug, Clone)]
pub struct OrderDetailLineView {
    pub product: String,
    pub quantity: i64,
    pub unit_price: String,
    pub line_total: String,
}

impl OrderDetailLineView {
    fn new(detail: &OrderDetail, names: &Names) -> Self {
        Self {
            product: names.product(detail.product_id),
            quantity: detail.quantity,
            unit_price: format_money(detail.unit_price),
            line_total: detail.total().map_or_else(|| OVERFLOW.to_owned(), format_money),
        }
    }
}

/// Order detail template.
#[derive(Template)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub order: Order,
    pub type_class: &'static str,
    pub status_class: &'static str,
    pub warehouse: String,
    pub supplier: Option<String>,
    pub lines: Vec<OrderDetailLineView>,
    pub units: i64,
    /// Sum of the line totals.
    pub lines_total: String,
    /// Total recorded on the order header, when the backend reports one.
    pub recorded_total: Option<String>,
    /// Header and lines disagree, usually after a partial save.
    pub totals_differ: bool,
}

/// Order with its lines.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<OrderId>,
) -> Result<Response, AppError> {
    let backend = state.backend();
    let (order, details, products, warehouses, suppliers) = tokio::join!(
        backend.get_order(id),
        backend.order_details(id),
        backend.list_products(),
        backend.list_warehouses(),
        backend.list_suppliers(),
    );
    let order = order?;

    let mut load_errors = Vec::new();
    let details = loaded(details, "order lines", &mut load_errors);
    let names = Names::new(
        &loaded(products, "products", &mut load_errors),
        &loaded(warehouses, "warehouses", &mut load_errors),
        &loaded(suppliers, "suppliers", &mut load_errors),
    );

    let lines_total = order_total(details.iter().map(|d| (d.quantity, d.unit_price)));
    let totals_differ = match (order.total, lines_total) {
        (Some(recorded), Some(lines)) => recorded.round_dp(2) != lines.round_dp(2),
        (Some(_), None) => true,
        (None, _) => false,
    };

    let template = OrderShowTemplate {
        current_path: "/orders",
        toasts: toast::take(&session).await,
        load_errors,
        type_class: type_class(order.order_type),
        status_class: status_class(order.status),
        warehouse: names.warehouse(order.warehouse_id),
        supplier: order.supplier_id.map(|id| names.supplier(id)),
        lines: details
            .iter()
            .map(|d| OrderDetailLineView::new(d, &names))
            .collect(),
        units: details
            .iter()
            .fold(0_i64, |units, d| units.saturating_add(d.quantity)),
        lines_total: lines_total.map_or_else(|| OVERFLOW.to_owned(), format_money),
        recorded_total: order.total.map(format_money),
        totals_differ,
        order,
    };
    Ok(render(&template))
}

/// Delete an order.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<OrderId>,
) -> Redirect {
    match state.backend().delete_order(id).await {
        Ok(()) => {
            tracing::info!(order_id = %id, "Order deleted");
            toast::push_success(&session, format!("Order #{id} deleted")).await;
            Redirect::to("/orders")
        }
        Err(e) => {
            tracing::error!(order_id = %id, error = %e, "Failed to delete order");
            toast::push_error(&session, e.user_message()).await;
            Redirect::to(&format!("/orders/{id}"))
        }
    }
}
