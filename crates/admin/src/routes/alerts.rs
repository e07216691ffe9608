//! Low-stock alert pages.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Redirect, Response},
};
use depot_core::models::LowStockAlert;
use depot_core::stock::{StockIndex, low_stock};
use depot_core::{AlertId, AlertStatus};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{Names, loaded, non_blank, render};
use crate::{filters, state::AppState, toast, toast::Toast};

/// A backend alert, ready to render.
#[derive(Debug, Clone)]
pub struct AlertView {
    pub id: AlertId,
    pub product: String,
    pub warehouse: String,
    pub quantity: i64,
    pub threshold: i64,
    pub shortfall: i64,
    pub status: String,
    pub is_open: bool,
    pub created_at: String,
}

impl AlertView {
    pub(crate) fn new(alert: &LowStockAlert, names: &Names) -> Self {
        Self {
            id: alert.id,
            product: names.product(alert.product_id),
            warehouse: names.warehouse(alert.warehouse_id),
            quantity: alert.quantity,
            threshold: alert.threshold,
            shortfall: alert.shortfall(),
            status: alert.status.label().to_string(),
            is_open: alert.status == AlertStatus::Open,
            created_at: alert.created_at.clone().unwrap_or_default(),
        }
    }
}

/// A stock level at or below its threshold, derived from current stock.
#[derive(Debug, Clone)]
pub struct LowStockView {
    pub product: String,
    pub sku: String,
    pub warehouse: String,
    pub quantity: i64,
    pub threshold: i64,
    pub shortfall: i64,
}

#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    pub show: Option<String>,
}

/// Alerts page template.
#[derive(Template)]
#[template(path = "alerts/index.html")]
pub struct AlertsIndexTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub show_all: bool,
    pub alerts: Vec<AlertView>,
    pub low_stock: Vec<LowStockView>,
    pub default_threshold: i64,
}

/// Alerts page: backend alerts plus low-stock rows computed locally.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<AlertsQuery>,
) -> Response {
    let show_all = non_blank(query.show.as_ref()) == Some("all");
    let backend = state.backend();
    let (alerts, products, warehouses, stock) = tokio::join!(
        backend.alerts(!show_all),
        backend.list_products(),
        backend.list_warehouses(),
        backend.stock(None),
    );

    let mut load_errors = Vec::new();
    let alerts = loaded(alerts, "alerts", &mut load_errors);
    let products = loaded(products, "products", &mut load_errors);
    let warehouses = loaded(warehouses, "warehouses", &mut load_errors);
    let stock = loaded(stock, "stock levels", &mut load_errors);

    let names = Names::new(&products, &warehouses, &[]);
    let index = StockIndex::from_rows(&stock);
    let default_threshold = state.config().low_stock_threshold;

    let low_stock = low_stock(&products, &index, default_threshold)
        .into_iter()
        .map(|row| LowStockView {
            product: row.product.name.clone(),
            sku: row.product.sku.clone(),
            warehouse: row
                .warehouse_id
                .map_or_else(|| "No stock anywhere".to_string(), |id| names.warehouse(id)),
            quantity: row.quantity,
            threshold: row.threshold,
            shortfall: row.shortfall(),
        })
        .collect();

    let template = AlertsIndexTemplate {
        current_path: "/alerts",
        toasts: toast::take(&session).await,
        load_errors,
        show_all,
        alerts: alerts.iter().map(|a| AlertView::new(a, &names)).collect(),
        low_stock,
        default_threshold,
    };
    render(&template)
}

/// Resolve an alert.
#[instrument(skip(state, session))]
pub async fn resolve(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<AlertId>,
) -> Redirect {
    match state.backend().resolve_alert(id).await {
        Ok(()) => {
            tracing::info!(alert_id = %id, "Alert resolved");
            toast::push_success(&session, format!("Alert #{id} resolved")).await;
        }
        Err(e) => {
            tracing::error!(alert_id = %id, error = %e, "Failed to resolve alert");
            toast::push_error(&session, e.user_message()).await;
        }
    }
    Redirect::to("/alerts")
}
