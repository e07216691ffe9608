//! Stock matrix and manual adjustments.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use depot_core::WarehouseId;
use depot_core::pagination::paginate;
use depot_core::stock::StockIndex;
use depot_core::validation::{AdjustmentForm, ValidationErrors, validate_adjustment};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{
    Names, Pager, SelectOption, loaded, matches_search, non_blank, parse_page, product_options,
    render, warehouse_options,
};
use crate::{
    components::data_table::{DataTableConfig, inventory_table_config},
    filters,
    state::AppState,
    toast,
    toast::Toast,
};

/// Query parameters for the inventory page.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    pub warehouse_id: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
}

impl InventoryQuery {
    fn warehouse(&self) -> Option<WarehouseId> {
        non_blank(self.warehouse_id.as_ref()).and_then(|id| id.parse().ok())
    }
}

/// Stock row view for templates.
#[derive(Debug, Clone)]
pub struct StockRowView {
    pub product: String,
    pub sku: String,
    pub warehouse: String,
    pub quantity: i64,
    pub threshold: i64,
    pub is_low_stock: bool,
}

/// Inventory index page template.
#[derive(Template)]
#[template(path = "inventory/index.html")]
pub struct InventoryIndexTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub table: DataTableConfig,
    pub rows: Vec<StockRowView>,
    pub pager: Pager,
    pub total_units: i64,
    pub low_stock_count: usize,
    pub adjust_form: AdjustmentForm,
    pub adjust_errors: ValidationErrors,
    pub products: Vec<SelectOption>,
    pub warehouses: Vec<SelectOption>,
}

async fn build_index(
    state: &AppState,
    query: &InventoryQuery,
    adjust_form: AdjustmentForm,
    adjust_errors: ValidationErrors,
) -> InventoryIndexTemplate {
    let backend = state.backend();
    let warehouse = query.warehouse();
    let (stock, products, warehouses) = tokio::join!(
        backend.stock(warehouse),
        backend.list_products(),
        backend.list_warehouses(),
    );

    let mut load_errors = Vec::new();
    let stock = loaded(stock, "stock levels", &mut load_errors);
    let products = loaded(products, "products", &mut load_errors);
    let warehouses = loaded(warehouses, "warehouses", &mut load_errors);
    let names = Names::new(&products, &warehouses, &[]);
    let default_threshold = state.config().low_stock_threshold;
    let search = non_blank(query.q.as_ref());

    let index = StockIndex::from_rows(&stock);
    let rows: Vec<StockRowView> = index
        .entries()
        .into_iter()
        .filter(|(_, warehouse_id, _)| warehouse.is_none_or(|w| w == *warehouse_id))
        .filter_map(|(product_id, warehouse_id, quantity)| {
            let product = products.iter().find(|p| p.id == product_id);
            let (name, sku) = product.map_or_else(
                || (names.product(product_id), String::new()),
                |p| (p.name.clone(), p.sku.clone()),
            );
            if !matches_search(search, &[name.as_str(), sku.as_str()]) {
                return None;
            }
            let threshold = product
                .and_then(|p| p.reorder_level)
                .unwrap_or(default_threshold);
            Some(StockRowView {
                product: name,
                sku,
                warehouse: names.warehouse(warehouse_id),
                quantity,
                threshold,
                is_low_stock: quantity <= threshold,
            })
        })
        .collect();

    let total_units = rows
        .iter()
        .fold(0_i64, |sum, r| sum.saturating_add(r.quantity));
    let low_stock_count = rows.iter().filter(|r| r.is_low_stock).count();
    let page = paginate(rows, parse_page(query.page.as_ref()), state.config().page_size);
    let warehouse_param = warehouse.map(|w| w.to_string());
    let pager = Pager::new(
        &page,
        "/inventory",
        &[("warehouse_id", warehouse_param.as_deref()), ("q", search)],
    );

    InventoryIndexTemplate {
        current_path: "/inventory",
        toasts: Vec::new(),
        load_errors,
        table: inventory_table_config(&warehouses)
            .selected("warehouse_id", warehouse_param.as_deref())
            .searched(search),
        rows: page.items,
        pager,
        total_units,
        low_stock_count,
        adjust_form,
        adjust_errors,
        products: product_options(&products),
        warehouses: warehouse_options(&warehouses),
    }
}

/// Inventory index page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<InventoryQuery>,
) -> Response {
    let adjust_form = AdjustmentForm {
        warehouse_id: query.warehouse_id.clone().unwrap_or_default(),
        ..AdjustmentForm::default()
    };
    let mut template = build_index(&state, &query, adjust_form, ValidationErrors::new()).await;
    template.toasts = toast::take(&session).await;
    render(&template)
}

/// Apply a manual stock adjustment.
#[instrument(skip(state, session, form))]
pub async fn adjust(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AdjustmentForm>,
) -> Response {
    let warehouse = form.warehouse_id.trim().parse::<WarehouseId>().ok();
    let stock = match state.backend().stock(warehouse).await {
        Ok(stock) => stock,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch stock for adjustment");
            toast::push_error(
                &session,
                format!("Could not check current stock: {}", e.user_message()),
            )
            .await;
            return Redirect::to("/inventory").into_response();
        }
    };

    let adjustment = match validate_adjustment(&form, &StockIndex::from_rows(&stock)) {
        Ok(adjustment) => adjustment,
        Err(errors) => {
            let query = InventoryQuery {
                warehouse_id: Some(form.warehouse_id.clone()),
                ..InventoryQuery::default()
            };
            return render(&build_index(&state, &query, form, errors).await);
        }
    };

    match state.backend().adjust_stock(&adjustment).await {
        Ok(()) => {
            tracing::info!(
                product_id = %adjustment.product_id,
                warehouse_id = %adjustment.warehouse_id,
                delta = adjustment.delta,
                "Stock adjusted"
            );
            toast::push_success(
                &session,
                format!("Stock adjusted by {:+}", adjustment.delta),
            )
            .await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to adjust stock");
            toast::push_error(&session, e.user_message()).await;
        }
    }
    Redirect::to(&format!("/inventory?warehouse_id={}", adjustment.warehouse_id)).into_response()
}
