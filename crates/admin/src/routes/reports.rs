//! Reports page: headline totals, stock per warehouse and best sellers.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::Response,
};
use depot_core::format_money;
use depot_core::models::{InventorySummary, TopProductRow, WarehouseStockRow};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{dashboard::DashboardMetrics, loaded, non_blank, render};
use crate::{filters, state::AppState, toast, toast::Toast};

const DEFAULT_TOP_LIMIT: u32 = 10;
const MAX_TOP_LIMIT: u32 = 100;

/// `?limit=` for the top products table.
#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    pub limit: Option<String>,
}

impl ReportsQuery {
    /// Requested limit, clamped to `1..=100`.
    #[must_use]
    pub fn limit(&self) -> u32 {
        non_blank(self.limit.as_ref())
            .and_then(|raw| raw.parse::<u32>().ok())
            .map_or(DEFAULT_TOP_LIMIT, |limit| limit.clamp(1, MAX_TOP_LIMIT))
    }
}

/// Choice in the top products size picker.
#[derive(Debug, Clone, Copy)]
pub struct LimitOption {
    pub value: u32,
    pub selected: bool,
}

/// Warehouse row with its share of all units.
#[derive(Debug, Clone)]
pub struct WarehouseShareView {
    pub name: String,
    pub product_count: i64,
    pub total_units: i64,
    /// Whole percent of all stocked units.
    pub share: i64,
}

/// Best-selling product row.
#[derive(Debug, Clone)]
pub struct TopProductView {
    pub rank: usize,
    pub name: String,
    pub units_sold: i64,
    pub revenue: String,
}

fn warehouse_shares(rows: &[WarehouseStockRow]) -> Vec<WarehouseShareView> {
    let total = rows
        .iter()
        .fold(0_i64, |sum, r| sum.saturating_add(r.total_units.max(0)));
    let mut views: Vec<_> = rows
        .iter()
        .map(|row| WarehouseShareView {
            name: row
                .warehouse_name
                .clone()
                .unwrap_or_else(|| format!("Warehouse #{}", row.warehouse_id)),
            product_count: row.product_count,
            total_units: row.total_units,
            share: if total > 0 {
                row.total_units.max(0) * 100 / total
            } else {
                0
            },
        })
        .collect();
    views.sort_by(|a, b| b.total_units.cmp(&a.total_units).then(a.name.cmp(&b.name)));
    views
}

fn top_product_views(rows: &[TopProductRow]) -> Vec<TopProductView> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| TopProductView {
            rank: i + 1,
            name: row
                .product_name
                .clone()
                .unwrap_or_else(|| format!("Product #{}", row.product_id)),
            units_sold: row.units_sold,
            revenue: format_money(row.revenue),
        })
        .collect()
}

/// Reports template.
#[derive(Template)]
#[template(path = "reports/index.html")]
pub struct ReportsTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub metrics: DashboardMetrics,
    pub warehouses: Vec<WarehouseShareView>,
    pub top_products: Vec<TopProductView>,
    pub limits: Vec<LimitOption>,
}

/// Reports page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ReportsQuery>,
) -> Response {
    let limit = query.limit();
    let backend = state.backend();
    let (summary, by_warehouse, top) = tokio::join!(
        backend.report_summary(),
        backend.stock_by_warehouse(),
        backend.top_products(limit),
    );

    let mut load_errors = Vec::new();
    let summary: InventorySummary = loaded(summary, "summary", &mut load_errors);
    let by_warehouse = loaded(by_warehouse, "stock by warehouse", &mut load_errors);
    let top = loaded(top, "top products", &mut load_errors);

    let template = ReportsTemplate {
        current_path: "/reports",
        toasts: toast::take(&session).await,
        load_errors,
        metrics: DashboardMetrics::from(&summary),
        warehouses: warehouse_shares(&by_warehouse),
        top_products: top_product_views(&top),
        limits: [5, 10, 25, 50]
            .into_iter()
            .map(|value| LimitOption {
                value,
                selected: value == limit,
            })
            .collect(),
    };
    render(&template)
}
