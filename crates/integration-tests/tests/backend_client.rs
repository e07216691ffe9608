//! Backend client against the mock REST backend.
//!
//! Run with: cargo test -p depot-integration-tests

#![allow(clippy::unwrap_used)]

use axum::http::Method;
use depot_admin::backend::{BackendError, Upload};
use depot_core::models::{NewOrder, NewOrderLine};
use depot_core::{
    AlertId, OrderId, OrderType, ProductId, SupplierId, TransferId, UserRole, WarehouseId,
};
use depot_integration_tests::{MockBackend, TOKEN};
use rust_decimal::Decimal;

fn import_order(total: Decimal) -> NewOrder {
    NewOrder {
        order_type: OrderType::Import,
        warehouse_id: WarehouseId::new(1),
        supplier_id: Some(SupplierId::new(1)),
        customer_name: None,
        note: Some("restock".to_owned()),
        total,
    }
}

fn line(product: i64, quantity: i64, cents: i64) -> NewOrderLine {
    NewOrderLine {
        product_id: ProductId::new(product),
        quantity,
        unit_price: Decimal::new(cents, 2),
    }
}

#[tokio::test]
async fn test_catalog_decodes_every_key_spelling_and_envelope() {
    let mock = MockBackend::start().await;
    let backend = mock.client();

    let products = backend.list_products().await.unwrap();
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Widget", "Gadget", "Gizmo"]);
    let gadget = products.get(1).unwrap();
    assert_eq!(gadget.id, ProductId::new(2));
    assert_eq!(gadget.sku, "G-2");
    assert_eq!(gadget.price, Decimal::from(10));
    assert_eq!(gadget.reorder_level, Some(3));
    assert_eq!(products.get(2).unwrap().price, Decimal::from(4));

    let warehouses = backend.list_warehouses().await.unwrap();
    assert_eq!(warehouses.len(), 2);
    assert_eq!(warehouses.get(1).unwrap().id, WarehouseId::new(2));
    assert_eq!(warehouses.get(1).unwrap().name, "South");

    let suppliers = backend.list_suppliers().await.unwrap();
    assert_eq!(suppliers.len(), 1);
    assert_eq!(suppliers.first().unwrap().name, "Acme Parts");

    let users = backend.list_users().await.unwrap();
    let clerk = users.get(1).unwrap();
    assert_eq!(clerk.username, "clerk");
    assert_eq!(clerk.role, UserRole::Staff);
    assert!(!clerk.is_active);
}

#[tokio::test]
async fn test_every_request_carries_the_bearer_token() {
    let mock = MockBackend::start().await;
    let backend = mock.client();

    backend.list_products().await.unwrap();
    backend.report_summary().await.unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    let expected = format!("Bearer {TOKEN}");
    assert!(
        requests
            .iter()
            .all(|r| r.authorization.as_deref() == Some(expected.as_str()))
    );
}

#[tokio::test]
async fn test_missing_token_is_unauthorized_with_backend_message() {
    let mock = MockBackend::start().await;
    let backend = mock.client_with_token(None);

    let err = backend.list_products().await.unwrap_err();
    match &err {
        BackendError::Unauthorized(message) => assert_eq!(message, "Missing or invalid token"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
    assert_eq!(
        err.user_message(),
        "The backend rejected our credentials: Missing or invalid token"
    );
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let mock = MockBackend::start().await;
    let err = mock.client().get_order(OrderId::new(999)).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Order not found");
}

#[tokio::test]
async fn test_order_and_lines_decode() {
    let mock = MockBackend::start().await;
    let backend = mock.client();

    let order = backend.get_order(OrderId::new(501)).await.unwrap();
    assert_eq!(order.order_type, OrderType::Sale);
    assert_eq!(order.warehouse_id, WarehouseId::new(1));
    assert_eq!(order.customer_name.as_deref(), Some("Jane Doe"));
    assert_eq!(order.total, Some(Decimal::new(2500, 2)));

    let details = backend.order_details(OrderId::new(501)).await.unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details.first().unwrap().total(), Some(Decimal::new(2500, 2)));

    let orders = backend.list_orders().await.unwrap();
    let import = orders.get(1).unwrap();
    assert_eq!(import.order_type, OrderType::Import);
    assert_eq!(import.supplier_id, Some(SupplierId::new(1)));
}

#[tokio::test]
async fn test_order_lines_are_posted_against_the_created_order() {
    let mock = MockBackend::start().await;
    let lines = [line(1, 2, 250), line(2, 1, 1000)];

    let order_id = mock
        .client()
        .create_order_with_details(&import_order(Decimal::new(1500, 2)), &lines)
        .await
        .unwrap();
    assert_eq!(order_id, OrderId::new(501));

    let header = mock.requests_to(&Method::POST, "orders");
    assert_eq!(header.len(), 1);
    let header = header.first().unwrap().json();
    assert_eq!(header["order_type"], "import");
    assert_eq!(header["supplier_id"], 1);

    let posted = mock.requests_to(&Method::POST, "order-details");
    assert_eq!(posted.len(), 2);
    for (request, expected) in posted.iter().zip([1, 2]) {
        let body = request.json();
        assert_eq!(body["order_id"], 501);
        assert_eq!(body["product_id"], expected);
    }
}

#[tokio::test]
async fn test_refused_line_reports_partial_order() {
    let mock = MockBackend::start().await;
    let lines = [line(1, 2, 250), line(3, 1, 400)];

    let err = mock
        .client()
        .create_order_with_details(&import_order(Decimal::new(900, 2)), &lines)
        .await
        .unwrap_err();

    match &err {
        BackendError::PartialOrder {
            order_id,
            created,
            total,
            source,
        } => {
            assert_eq!(*order_id, OrderId::new(501));
            assert_eq!(*created, 1);
            assert_eq!(*total, 2);
            assert_eq!(source.user_message(), "Insufficient stock for Gizmo");
        }
        other => panic!("expected PartialOrder, got {other:?}"),
    }
    assert!(err.user_message().contains("only 1 of 2 lines were saved"));
}

#[tokio::test]
async fn test_lines_after_a_refusal_are_not_sent() {
    let mock = MockBackend::start().await;
    let lines = [line(3, 1, 400), line(1, 2, 250)];

    let err = mock
        .client()
        .create_order_with_details(&import_order(Decimal::new(900, 2)), &lines)
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::PartialOrder { created: 0, total: 2, .. }));
    assert_eq!(mock.requests_to(&Method::POST, "order-details").len(), 1);
}

#[tokio::test]
async fn test_stock_filter_and_alert_filter_use_query_parameters() {
    let mock = MockBackend::start().await;
    let backend = mock.client();

    let rows = backend.stock(Some(WarehouseId::new(1))).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.warehouse_id == WarehouseId::new(1)));

    let alerts = backend.alerts(true).await.unwrap();
    let alert = alerts.first().unwrap();
    assert_eq!(alert.product_id, ProductId::new(2));
    assert_eq!(alert.shortfall(), 1);

    let queries: Vec<Option<String>> = mock.requests().into_iter().map(|r| r.query).collect();
    assert_eq!(
        queries,
        [Some("warehouse_id=1".to_owned()), Some("status=open".to_owned())]
    );
}

#[tokio::test]
async fn test_transfer_transitions_post_to_action_paths() {
    let mock = MockBackend::start().await;
    let backend = mock.client();
    let id = TransferId::new(1);

    backend.approve_transfer(id).await.unwrap();
    backend.reject_transfer(id).await.unwrap();
    backend.complete_transfer(id).await.unwrap();

    let paths: Vec<String> = mock.writes().into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        [
            "/api/stock-transfers/1/approve",
            "/api/stock-transfers/1/reject",
            "/api/stock-transfers/1/complete",
        ]
    );
}

#[tokio::test]
async fn test_backend_refusal_of_a_transition_surfaces_its_message() {
    let mock = MockBackend::start().await;
    let err = mock
        .client()
        .complete_transfer(TransferId::new(2))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Api { status: 409, .. }));
    assert_eq!(err.user_message(), "Transfer 2 is already completed");
}

#[tokio::test]
async fn test_transfers_decode_both_spellings() {
    let mock = MockBackend::start().await;
    let transfers = mock.client().list_transfers().await.unwrap();
    assert_eq!(transfers.len(), 2);
    let second = transfers.get(1).unwrap();
    assert_eq!(second.from_warehouse_id, WarehouseId::new(2));
    assert_eq!(second.to_warehouse_id, WarehouseId::new(1));
    assert_eq!(second.quantity, 1);
}

#[tokio::test]
async fn test_alert_resolution_posts_to_resolve_path() {
    let mock = MockBackend::start().await;
    mock.client().resolve_alert(AlertId::new(1)).await.unwrap();
    assert_eq!(
        mock.requests_to(&Method::POST, "inventory/alerts/1/resolve").len(),
        1
    );
}

#[tokio::test]
async fn test_reports_decode_and_limit_is_forwarded() {
    let mock = MockBackend::start().await;
    let backend = mock.client();

    let summary = backend.report_summary().await.unwrap();
    assert_eq!(summary.product_count, 3);
    assert_eq!(summary.total_units, 34);
    assert_eq!(summary.stock_value, Decimal::new(12200, 2));

    let by_warehouse = backend.stock_by_warehouse().await.unwrap();
    assert_eq!(by_warehouse.get(1).unwrap().total_units, 12);

    let top = backend.top_products(1).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top.first().unwrap().units_sold, 30);
    let request = mock.requests_to(&Method::GET, "reports/top-products");
    assert_eq!(request.first().unwrap().query.as_deref(), Some("limit=1"));
}

#[tokio::test]
async fn test_upload_is_sent_as_multipart() {
    let mock = MockBackend::start().await;
    let backend = mock.client();

    backend
        .upload_file(Upload {
            filename: "counts.csv".to_owned(),
            content_type: Some("text/csv".to_owned()),
            bytes: b"sku,qty\nW-1,20\n".to_vec(),
        })
        .await
        .unwrap();

    let upload = mock.requests_to(&Method::POST, "files");
    let body = &upload.first().unwrap().body;
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"counts.csv\""));
    assert!(body.contains("W-1,20"));

    let files = backend.list_files().await.unwrap();
    let file = files.first().unwrap();
    assert_eq!(file.filename, "manifest.pdf");
    assert_eq!(file.size_label(), "2.0 KB");
}
