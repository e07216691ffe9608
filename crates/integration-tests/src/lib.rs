//! Integration test harness for Depot.
//!
//! [`MockBackend`] serves a small fixed inventory over the same REST paths
//! as the real backend, mounted under `/api/`, and records every request it
//! receives so tests can assert on what the dashboard actually sent.
//!
//! The fixtures deliberately mix key spellings (`pid`, `productName`,
//! `unitPrice`, ...) and response envelopes (`data`, `items`, `results`,
//! bare arrays) so decoding is exercised the way a loosely specified
//! backend would stress it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p depot-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    body::to_bytes,
    extract::{Request, State},
    http::{Method, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use depot_admin::backend::BackendClient;
use depot_admin::config::{AdminConfig, BackendConfig};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// Bearer token the mock accepts.
pub const TOKEN: &str = "test-token";

/// Id the mock assigns to every created order.
pub const CREATED_ORDER_ID: i64 = 501;

/// Product whose order lines the mock rejects as out of stock.
pub const REFUSED_PRODUCT_ID: i64 = 3;

/// Transfer the mock reports as already completed.
pub const COMPLETED_TRANSFER_ID: i64 = 2;

/// One request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// Body parsed as JSON, `Null` when it is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// In-process stand-in for the inventory REST backend.
pub struct MockBackend {
    addr: SocketAddr,
    state: MockState,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Bind to an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL of the mock API, without a trailing slash.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client authenticated with [`TOKEN`].
    #[must_use]
    pub fn client(&self) -> BackendClient {
        self.client_with_token(Some(TOKEN))
    }

    /// Client with an arbitrary token, or none.
    #[must_use]
    pub fn client_with_token(&self, token: Option<&str>) -> BackendClient {
        let config = BackendConfig::new(
            &self.url(),
            token.map(str::to_owned),
            Duration::from_secs(5),
        )
        .expect("Mock URL is valid");
        BackendClient::new(config).expect("Failed to build backend client")
    }

    /// Dashboard configuration pointed at the mock.
    #[must_use]
    pub fn admin_config(&self) -> AdminConfig {
        admin_config_for(&self.url())
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests matching a method and a path under `/api/`.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<RecordedRequest> {
        let full = format!("/api/{}", path.trim_start_matches('/'));
        self.requests()
            .into_iter()
            .filter(|r| r.method == *method && r.path == full)
            .collect()
    }

    /// Requests that were not plain reads.
    #[must_use]
    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != Method::GET)
            .collect()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Dashboard configuration for an arbitrary backend URL.
#[must_use]
pub fn admin_config_for(url: &str) -> AdminConfig {
    let url = url.to_owned();
    AdminConfig::from_lookup(move |key| match key {
        "DEPOT_API_URL" => Some(url.clone()),
        "DEPOT_API_TOKEN" => Some(TOKEN.to_owned()),
        "DEPOT_API_TIMEOUT_SECS" => Some("2".to_owned()),
        _ => None,
    })
    .expect("Test configuration is valid")
}

// =============================================================================
// Request handling
// =============================================================================

async fn handle(State(state): State<MockState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let recorded = RecordedRequest {
        method: parts.method,
        path: parts.uri.path().to_owned(),
        query: parts.uri.query().map(str::to_owned),
        authorization: parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    };

    let response = respond(&recorded);
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(recorded);
    response
}

fn respond(request: &RecordedRequest) -> Response {
    let expected = format!("Bearer {TOKEN}");
    if request.authorization.as_deref() != Some(expected.as_str()) {
        return error(StatusCode::UNAUTHORIZED, json!({"message": "Missing or invalid token"}));
    }

    let Some(path) = request.path.strip_prefix("/api/") else {
        return (StatusCode::NOT_FOUND, "No such route").into_response();
    };
    let segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();

    match (request.method.as_str(), segments.as_slice()) {
        ("GET", ["health"]) => "ok".into_response(),

        // Catalog, each resource with its own envelope
        ("GET", ["products"]) => Json(json!({ "data": products() })).into_response(),
        ("GET", ["products", id]) => find_by_id(&products(), "pid", id, "Product"),
        ("GET", ["warehouses"]) => Json(warehouses()).into_response(),
        ("GET", ["warehouses", id]) => find_by_id(&warehouses(), "wid", id, "Warehouse"),
        ("GET", ["suppliers"]) => Json(json!({ "items": suppliers() })).into_response(),
        ("GET", ["suppliers", id]) => find_by_id(&suppliers(), "sid", id, "Supplier"),
        ("GET", ["users"]) => Json(json!({ "results": users() })).into_response(),
        ("GET", ["users", id]) => find_by_id(&users(), "uid", id, "User"),
        ("POST", ["products" | "warehouses" | "suppliers" | "users"]) => {
            (StatusCode::CREATED, Json(json!({ "id": 99 }))).into_response()
        }
        ("PUT", ["products" | "warehouses" | "suppliers" | "users", _]) => {
            Json(json!({ "ok": true })).into_response()
        }
        ("DELETE", ["products" | "warehouses" | "suppliers" | "users" | "orders" | "files", _]) => {
            StatusCode::NO_CONTENT.into_response()
        }

        // Inventory
        ("GET", ["inventory", "stock"]) => {
            let rows = match query_param(request, "warehouse_id") {
                Some(warehouse) => filter_rows(&stock(), &["wid", "warehouseId", "warehouse_id"], &warehouse),
                None => stock(),
            };
            Json(json!({ "data": rows })).into_response()
        }
        ("POST", ["inventory", "adjust"]) => Json(json!({ "ok": true })).into_response(),
        ("GET", ["inventory", "alerts"]) => Json(alerts()).into_response(),
        ("POST", ["inventory", "alerts", _, "resolve"]) => StatusCode::NO_CONTENT.into_response(),

        // Transfers
        ("GET", ["stock-transfers"]) => Json(transfers()).into_response(),
        ("POST", ["stock-transfers"]) => StatusCode::CREATED.into_response(),
        ("POST", ["stock-transfers", id, "approve" | "reject" | "complete"]) => {
            if id_matches(id, COMPLETED_TRANSFER_ID) {
                error(
                    StatusCode::CONFLICT,
                    json!({ "error": { "message": format!("Transfer {id} is already completed") } }),
                )
            } else {
                StatusCode::NO_CONTENT.into_response()
            }
        }

        // Orders
        ("GET", ["orders"]) => Json(json!({ "data": orders() })).into_response(),
        ("POST", ["orders"]) => (
            StatusCode::CREATED,
            Json(json!({ "data": { "Id": CREATED_ORDER_ID.to_string() } })),
        )
            .into_response(),
        ("GET", ["orders", id, "details"]) => {
            Json(filter_rows(&order_details(), &["oid"], id)).into_response()
        }
        ("GET", ["orders", id]) => find_by_id(&orders(), "oid", id, "Order"),
        ("POST", ["order-details"]) => {
            let product = request.json().get("product_id").and_then(id_value);
            if product == Some(REFUSED_PRODUCT_ID) {
                error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({ "message": "Insufficient stock for Gizmo" }),
                )
            } else {
                (StatusCode::CREATED, Json(json!({ "id": 1 }))).into_response()
            }
        }

        // Reports
        ("GET", ["reports", "summary"]) => Json(summary()).into_response(),
        ("GET", ["reports", "stock-by-warehouse"]) => Json(stock_by_warehouse()).into_response(),
        ("GET", ["reports", "top-products"]) => {
            let limit = query_param(request, "limit")
                .and_then(|l| l.parse::<usize>().ok())
                .unwrap_or(10);
            let rows: Vec<Value> = top_products().into_iter().take(limit).collect();
            Json(rows).into_response()
        }

        // Files
        ("GET", ["files"]) => Json(json!({ "data": files() })).into_response(),
        ("POST", ["files"]) => {
            if request.body.contains("filename=") {
                (StatusCode::CREATED, Json(json!({ "id": 7 }))).into_response()
            } else {
                error(StatusCode::BAD_REQUEST, json!({ "detail": "No file attached" }))
            }
        }

        _ => (StatusCode::NOT_FOUND, "No such route").into_response(),
    }
}

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn query_param(request: &RecordedRequest, name: &str) -> Option<String> {
    request.query.as_deref()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_owned())
    })
}

fn id_value(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

fn id_matches(raw: &str, id: i64) -> bool {
    raw.parse::<i64>().is_ok_and(|raw| raw == id)
}

fn row_matches(row: &Value, keys: &[&str], id: &str) -> bool {
    keys.iter()
        .filter_map(|key| row.get(*key).and_then(id_value))
        .any(|value| id_matches(id, value))
}

fn find_by_id(rows: &Value, short_key: &str, id: &str, what: &str) -> Response {
    let keys = ["id", "Id", short_key];
    let found = rows.as_array().and_then(|rows| {
        rows.iter()
            .find(|row| row_matches(row, &keys, id))
    });
    match found {
        Some(row) => Json(row.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, json!({ "detail": format!("{what} not found") })),
    }
}

fn filter_rows(rows: &Value, keys: &[&str], id: &str) -> Value {
    let matching = rows
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter(|row| row_matches(row, keys, id))
                .cloned()
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    Value::Array(matching)
}

// =============================================================================
// Fixtures
// =============================================================================

fn products() -> Value {
    json!([
        { "id": 1, "name": "Widget", "sku": "W-1", "price": "2.50", "supplier_id": 1, "reorder_level": 5 },
        { "pid": "2", "productName": "Gadget", "SKU": "G-2", "unitPrice": 10, "minStock": 3 },
        { "Id": 3, "product_name": "Gizmo", "code": "Z-3", "unit_price": 4.0 }
    ])
}

fn warehouses() -> Value {
    json!([
        { "id": 1, "name": "North", "address": "1 Dock Rd" },
        { "wid": "2", "warehouseName": "South", "capacity": 500 }
    ])
}

fn suppliers() -> Value {
    json!([{ "sid": 1, "supplierName": "Acme Parts", "email": "sales@acme.test" }])
}

fn users() -> Value {
    json!([
        { "id": 1, "username": "admin", "email": "admin@depot.test", "role": "admin" },
        { "uid": 2, "userName": "clerk", "email": "clerk@depot.test", "role": "staff", "isActive": false }
    ])
}

fn stock() -> Value {
    json!([
        { "pid": 1, "wid": 1, "qty": 20 },
        { "productId": 2, "warehouseId": 1, "quantity": 2 },
        { "product_id": "3", "warehouse_id": "2", "stock": 8 },
        { "pid": 1, "wid": 2, "qty": 4 }
    ])
}

fn alerts() -> Value {
    json!([
        { "aid": 1, "pid": 2, "wid": 1, "current_quantity": 2, "min_quantity": 3, "status": "open" }
    ])
}

fn transfers() -> Value {
    json!([
        { "tid": 1, "pid": 1, "from_wid": 1, "to_wid": 2, "qty": 5, "status": "pending" },
        { "id": 2, "productId": 3, "fromWarehouseId": 2, "toWarehouseId": 1, "quantity": 1, "status": "completed" }
    ])
}

fn orders() -> Value {
    json!([
        {
            "id": 501, "type": "sale", "status": "pending", "wid": 1,
            "customerName": "Jane Doe", "totalAmount": "25.00", "createdAt": "2024-03-05T10:00:00Z"
        },
        { "oid": 502, "orderType": "import", "warehouseId": 2, "supplierId": 1, "total": 40 }
    ])
}

fn order_details() -> Value {
    json!([
        { "id": 1, "oid": 501, "pid": 1, "qty": 10, "price": "2.50" },
        { "id": 2, "oid": 502, "pid": 3, "qty": 10, "unitPrice": 4 }
    ])
}

fn summary() -> Value {
    json!({
        "totalProducts": 3, "totalWarehouses": 2, "supplierCount": 1, "orderCount": 2,
        "pendingOrders": 1, "openAlerts": 1, "totalStock": 34, "stockValue": "122.00"
    })
}

fn stock_by_warehouse() -> Value {
    json!([
        { "warehouseId": 1, "name": "North", "productCount": 2, "totalUnits": 22 },
        { "wid": 2, "warehouseName": "South", "products": 2, "quantity": 12 }
    ])
}

fn top_products() -> Vec<Value> {
    vec![
        json!({ "productId": 1, "productName": "Widget", "unitsSold": 30, "totalRevenue": "75.00" }),
        json!({ "pid": 3, "name": "Gizmo", "units_sold": 10, "revenue": 40 }),
    ]
}

fn files() -> Value {
    json!([
        {
            "id": 1, "fileName": "manifest.pdf", "bytes": 2048,
            "mimeType": "application/pdf", "uploadedAt": "2024-03-01T08:00:00Z"
        }
    ])
}
