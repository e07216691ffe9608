//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness
//! GET  /health/ready                  - Backend reachability
//!
//! GET  /                              - Dashboard overview
//!
//! GET  /users            POST /users  - List / create
//! GET  /users/new                     - Create form
//! GET  /users/{id}/edit  POST /users/{id}
//! POST /users/{id}/delete
//!
//! (same CRUD shape for /products, /warehouses, /suppliers)
//!
//! GET  /orders           POST /orders - List / create header + lines
//! GET  /orders/new                    - Order form
//! POST /orders/new                    - Re-render form (add/remove lines, refresh warehouses)
//! GET  /orders/{id}                   - Order with lines
//! POST /orders/{id}/delete
//!
//! GET  /inventory                     - Stock matrix
//! POST /inventory/adjust              - Manual adjustment
//!
//! GET  /transfers        POST /transfers
//! GET  /transfers/new
//! POST /transfers/{id}/{action}       - approve | reject | complete
//!
//! GET  /alerts                        - Backend alerts + derived low-stock rows
//! POST /alerts/{id}/resolve
//!
//! GET  /files            POST /files  - List / multipart upload
//! POST /files/{id}/delete
//!
//! GET  /reports                       - Stock by warehouse, top products
//! ```

pub mod alerts;
pub mod dashboard;
pub mod files;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod reports;
pub mod suppliers;
pub mod transfers;
pub mod users;
pub mod warehouses;

use std::collections::HashMap;

use askama::Template;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use depot_core::models::{Product, Supplier, Warehouse};
use depot_core::pagination::Page;
use depot_core::{ProductId, SupplierId, WarehouseId};
use serde::Deserialize;
use url::form_urlencoded;

use crate::backend::BackendError;
use crate::state::AppState;

/// Largest accepted upload body.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Pages shown either side of the current one in pagination links.
const PAGE_LINK_RADIUS: usize = 2;

/// Build the dashboard router (without state).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        // Dashboard
        .route("/", get(dashboard::index))
        // Users
        .route("/users", get(users::index).post(users::create))
        .route("/users/new", get(users::new))
        .route("/users/{id}", post(users::update))
        .route("/users/{id}/edit", get(users::edit))
        .route("/users/{id}/delete", post(users::delete))
        // Products
        .route("/products", get(products::index).post(products::create))
        .route("/products/new", get(products::new))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/edit", get(products::edit))
        .route("/products/{id}/delete", post(products::delete))
        // Warehouses
        .route("/warehouses", get(warehouses::index).post(warehouses::create))
        .route("/warehouses/new", get(warehouses::new))
        .route("/warehouses/{id}", post(warehouses::update))
        .route("/warehouses/{id}/edit", get(warehouses::edit))
        .route("/warehouses/{id}/delete", post(warehouses::delete))
        // Suppliers
        .route("/suppliers", get(suppliers::index).post(suppliers::create))
        .route("/suppliers/new", get(suppliers::new))
        .route("/suppliers/{id}", post(suppliers::update))
        .route("/suppliers/{id}/edit", get(suppliers::edit))
        .route("/suppliers/{id}/delete", post(suppliers::delete))
        // Orders
        .route("/orders", get(orders::index).post(orders::create))
        .route("/orders/new", get(orders::new).post(orders::refresh))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/delete", post(orders::delete))
        // Inventory
        .route("/inventory", get(inventory::index))
        .route("/inventory/adjust", post(inventory::adjust))
        // Transfers
        .route("/transfers", get(transfers::index).post(transfers::create))
        .route("/transfers/new", get(transfers::new))
        .route("/transfers/{id}/{action}", post(transfers::transition))
        // Alerts
        .route("/alerts", get(alerts::index))
        .route("/alerts/{id}/resolve", post(alerts::resolve))
        // Files
        .route(
            "/files",
            get(files::index)
                .post(files::upload)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/files/{id}/delete", post(files::delete))
        // Reports
        .route("/reports", get(reports::index))
}

/// Render a template, logging and hiding render failures.
pub(crate) fn render<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template render error: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Trimmed value of an optional query/form field, `None` when blank.
pub(crate) fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Unwrap a page read, logging the failure and queueing a banner message.
///
/// Pages degrade to empty sections rather than failing as a whole.
pub(crate) fn loaded<T: Default>(
    result: Result<T, BackendError>,
    what: &str,
    load_errors: &mut Vec<String>,
) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch {what}");
        load_errors.push(format!("Could not load {what}: {}", e.user_message()));
        T::default()
    })
}

/// Display names for foreign keys.
#[derive(Debug, Default)]
pub(crate) struct Names {
    products: HashMap<ProductId, String>,
    warehouses: HashMap<WarehouseId, String>,
    suppliers: HashMap<SupplierId, String>,
}

impl Names {
    pub(crate) fn new(products: &[Product], warehouses: &[Warehouse], suppliers: &[Supplier]) -> Self {
        Self {
            products: products.iter().map(|p| (p.id, p.name.clone())).collect(),
            warehouses: warehouses.iter().map(|w| (w.id, w.name.clone())).collect(),
            suppliers: suppliers.iter().map(|s| (s.id, s.name.clone())).collect(),
        }
    }

    pub(crate) fn product(&self, id: ProductId) -> String {
        self.products
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Product #{id}"))
    }

    pub(crate) fn warehouse(&self, id: WarehouseId) -> String {
        self.warehouses
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Warehouse #{id}"))
    }

    pub(crate) fn supplier(&self, id: SupplierId) -> String {
        self.suppliers
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Supplier #{id}"))
    }
}

/// `?page=&q=` shared by list pages.
///
/// `page` is kept as text so a malformed value falls back to page 1 instead
/// of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub q: Option<String>,
}

impl ListQuery {
    #[must_use]
    pub fn page(&self) -> usize {
        parse_page(self.page.as_ref())
    }

    #[must_use]
    pub fn search(&self) -> Option<&str> {
        non_blank(self.q.as_ref())
    }
}

pub(crate) fn parse_page(raw: Option<&String>) -> usize {
    non_blank(raw)
        .and_then(|p| p.parse().ok())
        .unwrap_or(1)
}

/// Case-insensitive substring match used by list searches.
pub(crate) fn matches_search(needle: Option<&str>, haystacks: &[&str]) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    let needle = needle.to_lowercase();
    haystacks
        .iter()
        .any(|h| h.to_lowercase().contains(&needle))
}

/// One `<option>` of a form dropdown.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl ToString, label: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
        }
    }
}

pub(crate) fn product_options(products: &[Product]) -> Vec<SelectOption> {
    products
        .iter()
        .map(|p| SelectOption::new(p.id, p.label()))
        .collect()
}

pub(crate) fn warehouse_options(warehouses: &[Warehouse]) -> Vec<SelectOption> {
    warehouses
        .iter()
        .map(|w| SelectOption::new(w.id, w.name.clone()))
        .collect()
}

pub(crate) fn supplier_options(suppliers: &[Supplier]) -> Vec<SelectOption> {
    suppliers
        .iter()
        .map(|s| SelectOption::new(s.id, s.name.clone()))
        .collect()
}

/// A numbered pagination link.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub number: usize,
    pub url: String,
    pub current: bool,
}

/// Pagination controls for a list page.
#[derive(Debug, Clone)]
pub struct Pager {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub first_index: usize,
    pub last_index: usize,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub links: Vec<PageLink>,
}

impl Pager {
    /// Build links for `path`, keeping every non-blank filter in `params`.
    pub fn new<T>(page: &Page<T>, path: &str, params: &[(&str, Option<&str>)]) -> Self {
        let url = |number: usize| {
            let mut query = form_urlencoded::Serializer::new(String::new());
            for (key, value) in params {
                if let Some(value) = value.filter(|v| !v.is_empty()) {
                    query.append_pair(key, value);
                }
            }
            if number > 1 {
                query.append_pair("page", &number.to_string());
            }
            let query = query.finish();
            if query.is_empty() {
                path.to_owned()
            } else {
                format!("{path}?{query}")
            }
        };

        Self {
            page: page.page,
            total_pages: page.total_pages,
            total_items: page.total_items,
            first_index: page.first_index(),
            last_index: page.last_index(),
            prev_url: page.has_prev().then(|| url(page.prev_page())),
            next_url: page.has_next().then(|| url(page.next_page())),
            links: page
                .window(PAGE_LINK_RADIUS)
                .into_iter()
                .map(|number| PageLink {
                    number,
                    url: url(number),
                    current: number == page.page,
                })
                .collect(),
        }
    }

    /// Whether more than one page exists.
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        self.total_pages > 1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use depot_core::pagination::paginate;

    #[test]
    fn test_pager_keeps_filters_and_drops_blank_ones() {
        let page = paginate((1..=50).collect::<Vec<_>>(), 2, 20);
        let pager = Pager::new(
            &page,
            "/orders",
            &[("status", Some("pending")), ("q", Some("")), ("order_type", None)],
        );
        assert_eq!(pager.prev_url.as_deref(), Some("/orders?status=pending"));
        assert_eq!(
            pager.next_url.as_deref(),
            Some("/orders?status=pending&page=3")
        );
        assert_eq!(pager.links.len(), 3);
        assert!(pager.links[1].current);
        assert_eq!((pager.first_index, pager.last_index), (21, 40));
    }

    #[test]
    fn test_single_page_has_no_navigation() {
        let page = paginate(Vec::<i32>::new(), 4, 20);
        let pager = Pager::new(&page, "/files", &[]);
        assert!(!pager.is_paged());
        assert!(pager.prev_url.is_none());
        assert!(pager.next_url.is_none());
        assert_eq!(pager.links[0].url, "/files");
    }

    #[test]
    fn test_malformed_page_falls_back_to_first() {
        let query = ListQuery {
            page: Some("two".into()),
            q: Some("  ".into()),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.search(), None);
    }

    #[test]
    fn test_names_fall_back_to_ids() {
        let names = Names::default();
        assert_eq!(names.product(ProductId::new(4)), "Product #4");
        assert_eq!(names.warehouse(WarehouseId::new(2)), "Warehouse #2");
    }

    #[test]
    fn test_search_matches_any_field_ignoring_case() {
        assert!(matches_search(Some("bol"), &["Hex BOLT", "B-1"]));
        assert!(!matches_search(Some("nut"), &["Hex Bolt"]));
        assert!(matches_search(None, &[]));
    }
}
