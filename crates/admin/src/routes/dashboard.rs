//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Response};
use depot_core::TransferStatus;
use depot_core::format_money;
use depot_core::models::InventorySummary;
use tower_sessions::Session;
use tracing::instrument;

use super::alerts::AlertView;
use super::transfers::TransferView;
use super::{Names, loaded, render};
use crate::{filters, state::AppState, toast, toast::Toast};

/// Rows shown in each dashboard panel.
const PANEL_ROWS: usize = 5;

/// Headline counters, preformatted.
#[derive(Debug, Clone)]
pub struct DashboardMetrics {
    pub products: i64,
    pub warehouses: i64,
    pub suppliers: i64,
    pub orders: i64,
    pub pending_orders: i64,
    pub open_alerts: i64,
    pub total_units: i64,
    pub stock_value: String,
}

impl From<&InventorySummary> for DashboardMetrics {
    fn from(summary: &InventorySummary) -> Self {
        Self {
            products: summary.product_count,
            warehouses: summary.warehouse_count,
            suppliers: summary.supplier_count,
            orders: summary.order_count,
            pending_orders: summary.pending_orders,
            open_alerts: summary.open_alerts,
            total_units: summary.total_units,
            stock_value: format_money(summary.stock_value),
        }
    }
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub metrics: DashboardMetrics,
    pub alerts: Vec<AlertView>,
    pub more_alerts: usize,
    pub pending_transfers: Vec<TransferView>,
    pub more_transfers: usize,
}

/// Dashboard page handler.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, session: Session) -> Response {
    let backend = state.backend();
    let (summary, alerts, transfers, products, warehouses) = tokio::join!(
        backend.report_summary(),
        backend.alerts(true),
        backend.list_transfers(),
        backend.list_products(),
        backend.list_warehouses(),
    );

    let mut load_errors = Vec::new();
    let summary = loaded(summary, "summary", &mut load_errors);
    let alerts = loaded(alerts, "alerts", &mut load_errors);
    let transfers = loaded(transfers, "transfers", &mut load_errors);
    let products = loaded(products, "products", &mut load_errors);
    let warehouses = loaded(warehouses, "warehouses", &mut load_errors);
    let names = Names::new(&products, &warehouses, &[]);

    let mut alerts: Vec<AlertView> = alerts
        .iter()
        .map(|alert| AlertView::new(alert, &names))
        .collect();
    alerts.sort_by(|a, b| b.shortfall.cmp(&a.shortfall));
    let more_alerts = alerts.len().saturating_sub(PANEL_ROWS);
    alerts.truncate(PANEL_ROWS);

    let mut pending_transfers: Vec<TransferView> = transfers
        .iter()
        .filter(|t| t.status == TransferStatus::Pending)
        .map(|t| TransferView::new(t, &names))
        .collect();
    let more_transfers = pending_transfers.len().saturating_sub(PANEL_ROWS);
    pending_transfers.truncate(PANEL_ROWS);

    let template = DashboardTemplate {
        current_path: "/",
        toasts: toast::take(&session).await,
        load_errors,
        metrics: DashboardMetrics::from(&summary),
        alerts,
        more_alerts,
        pending_transfers,
        more_transfers,
    };
    render(&template)
}
