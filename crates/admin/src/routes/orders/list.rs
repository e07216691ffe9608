//! Orders list page handler.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::Response,
};
use depot_core::models::Order;
use depot_core::pagination::paginate;
use depot_core::{OrderId, OrderStatus, OrderType, WarehouseId, format_money};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::super::{Names, Pager, loaded, matches_search, non_blank, parse_page, render};
use super::{status_class, type_class};
use crate::{
    components::data_table::{DataTableConfig, orders_table_config},
    filters,
    state::AppState,
    toast,
    toast::Toast,
};

/// Query parameters for the orders list.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub order_type: Option<String>,
    pub status: Option<String>,
    pub warehouse_id: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
}

/// Order row for the list page.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: OrderId,
    pub order_type: &'static str,
    pub type_class: &'static str,
    pub status: &'static str,
    pub status_class: &'static str,
    pub warehouse: String,
    /// Customer for sales, supplier otherwise.
    pub party: String,
    pub total: String,
    pub created_at: String,
}

impl OrderRowView {
    fn new(order: &Order, names: &Names) -> Self {
        let party = order.customer_name.clone().unwrap_or_else(|| {
            order
                .supplier_id
                .map(|s| names.supplier(s))
                .unwrap_or_default()
        });
        Self {
            id: order.id,
            order_type: order.order_type.label(),
            type_class: type_class(order.order_type),
            status: order.status.label(),
            status_class: status_class(order.status),
            warehouse: names.warehouse(order.warehouse_id),
            party,
            total: order.total.map(format_money).unwrap_or_default(),
            created_at: order.created_at.clone().unwrap_or_default(),
        }
    }
}

/// Orders list page template.
#[derive(Template)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub table: DataTableConfig,
    pub orders: Vec<OrderRowView>,
    pub pager: Pager,
}

/// Orders list page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OrdersQuery>,
) -> Response {
    let backend = state.backend();
    let (orders, warehouses, suppliers) = tokio::join!(
        backend.list_orders(),
        backend.list_warehouses(),
        backend.list_suppliers(),
    );

    let mut load_errors = Vec::new();
    let mut orders = loaded(orders, "orders", &mut load_errors);
    let warehouses = loaded(warehouses, "warehouses", &mut load_errors);
    let suppliers = loaded(suppliers, "suppliers", &mut load_errors);
    let names = Names::new(&[], &warehouses, &suppliers);

    let order_type =
        non_blank(query.order_type.as_ref()).and_then(|t| t.parse::<OrderType>().ok());
    let status = non_blank(query.status.as_ref()).and_then(|s| s.parse::<OrderStatus>().ok());
    let warehouse =
        non_blank(query.warehouse_id.as_ref()).and_then(|w| w.parse::<WarehouseId>().ok());
    let search = non_blank(query.q.as_ref());

    orders.retain(|o| {
        order_type.is_none_or(|t| o.order_type == t)
            && status.is_none_or(|s| o.status == s)
            && warehouse.is_none_or(|w| o.warehouse_id == w)
    });
    let mut rows: Vec<OrderRowView> = orders
        .iter()
        .map(|o| OrderRowView::new(o, &names))
        .filter(|row| {
            matches_search(search, &[row.id.to_string().as_str(), row.party.as_str()])
        })
        .collect();
    rows.sort_by(|a, b| b.id.cmp(&a.id));

    let type_param = order_type.map(OrderType::as_str);
    let status_param = status.map(OrderStatus::as_str);
    let warehouse_param = warehouse.map(|w| w.to_string());
    let page = paginate(rows, parse_page(query.page.as_ref()), state.config().page_size);
    let pager = Pager::new(
        &page,
        "/orders",
        &[
            ("order_type", type_param),
            ("status", status_param),
            ("warehouse_id", warehouse_param.as_deref()),
            ("q", search),
        ],
    );

    let template = OrdersIndexTemplate {
        current_path: "/orders",
        toasts: toast::take(&session).await,
        load_errors,
        table: orders_table_config(&warehouses)
            .selected("order_type", type_param)
            .selected("status", status_param)
            .selected("warehouse_id", warehouse_param.as_deref())
            .searched(search),
        orders: page.items,
        pager,
    };
    render(&template)
}
