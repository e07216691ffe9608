//! Order form: header plus a variable number of product lines.
//!
//! The form posts to `/orders/new` to add or remove a line or to refresh
//! the warehouse list, and to `/orders` to create the order. Both rebuild
//! the form from the raw pairs so nothing typed is lost.

use std::collections::BTreeSet;

use askama::Template;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use depot_core::models::{Product, Supplier, Warehouse};
use depot_core::stock::{StockIndex, compatible_warehouses};
use depot_core::validation::{OrderForm, OrderLineForm, ValidationErrors, validate_order};
use depot_core::{OrderType, format_money, line_total, parse_money};
use rust_decimal::Decimal;
use tower_sessions::Session;
use tracing::instrument;

use super::super::{
    SelectOption, loaded, product_options, render, supplier_options, warehouse_options,
};
use crate::{backend::BackendError, filters, state::AppState, toast, toast::Toast};

/// One line of the order form with its price preview.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub product_id: String,
    pub quantity: String,
    pub unit_price: String,
    /// The product's list price, shown as the placeholder.
    pub list_price: String,
    pub line_total: String,
}

impl OrderLineView {
    fn new(line: &OrderLineForm, products: &[Product]) -> (Self, Option<Decimal>) {
        let product = line
            .product()
            .and_then(|id| products.iter().find(|p| p.id == id));
        let price = parse_money(&line.unit_price)
            .ok()
            .or_else(|| product.map(|p| p.price));
        // None when the line total overflows
        let total = price.map_or(Some(Decimal::ZERO), |price| {
            line_total(line.quantity_value().max(0), price)
        });
        let view = Self {
            product_id: line.product_id.clone(),
            quantity: line.quantity.clone(),
            unit_price: line.unit_price.clone(),
            list_price: product
                .map(|p| format!("{:.2}", p.price))
                .unwrap_or_default(),
            line_total: match total {
                Some(total) if !total.is_zero() => format_money(total),
                Some(_) => String::new(),
                None => "too large".to_owned(),
            },
        };
        (view, total)
    }
}

/// Order form template.
#[derive(Template)]
#[template(path = "orders/form.html")]
pub struct OrderFormTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub form: OrderForm,
    pub errors: ValidationErrors,
    pub order_types: Vec<SelectOption>,
    pub products: Vec<SelectOption>,
    /// Warehouses able to fulfil the current lines.
    pub warehouses: Vec<SelectOption>,
    /// Warehouses left out because they lack stock.
    pub excluded_warehouses: Vec<String>,
    pub suppliers: Vec<SelectOption>,
    pub requires_supplier: bool,
    pub lines: Vec<OrderLineView>,
    pub estimated_total: String,
}

/// Everything the form needs from the backend.
#[derive(Default)]
struct FormData {
    products: Vec<Product>,
    warehouses: Vec<Warehouse>,
    suppliers: Vec<Supplier>,
    stock: StockIndex,
    load_errors: Vec<String>,
    stock_loaded: bool,
}

async fn load_form_data(state: &AppState) -> FormData {
    let backend = state.backend();
    let (products, warehouses, suppliers, stock) = tokio::join!(
        backend.list_products(),
        backend.list_warehouses(),
        backend.list_suppliers(),
        backend.stock(None),
    );

    let mut load_errors = Vec::new();
    let stock_loaded = stock.is_ok();
    let stock = loaded(stock, "stock levels", &mut load_errors);
    FormData {
        products: loaded(products, "products", &mut load_errors),
        warehouses: loaded(warehouses, "warehouses", &mut load_errors),
        suppliers: loaded(suppliers, "suppliers", &mut load_errors),
        stock: StockIndex::from_rows(&stock),
        load_errors,
        stock_loaded,
    }
}

impl OrderFormTemplate {
    fn new(form: OrderForm, errors: ValidationErrors, data: FormData) -> Self {
        let order_type = form.order_type_value();
        let compatible =
            compatible_warehouses(&data.warehouses, &data.stock, order_type, form.requested());
        let compatible_ids: BTreeSet<_> = compatible.iter().map(|w| w.id).collect();
        let excluded_warehouses = data
            .warehouses
            .iter()
            .filter(|w| !compatible_ids.contains(&w.id))
            .map(|w| w.name.clone())
            .collect();
        let compatible: Vec<Warehouse> = compatible.into_iter().cloned().collect();

        let mut estimated = Some(Decimal::ZERO);
        let lines = form
            .lines
            .iter()
            .map(|line| {
                let (view, total) = OrderLineView::new(line, &data.products);
                estimated = estimated
                    .zip(total)
                    .and_then(|(sum, total)| sum.checked_add(total));
                view
            })
            .collect();

        Self {
            current_path: "/orders",
            toasts: Vec::new(),
            load_errors: data.load_errors,
            order_types: OrderType::ALL
                .iter()
                .map(|t| SelectOption::new(t.as_str(), t.label()))
                .collect(),
            products: product_options(&data.products),
            warehouses: warehouse_options(&compatible),
            excluded_warehouses,
            suppliers: supplier_options(&data.suppliers),
            requires_supplier: order_type.requires_supplier(),
            lines,
            estimated_total: estimated.map_or_else(|| "too large".to_owned(), format_money),
            form,
            errors,
        }
    }

    fn with_error(mut self, message: String) -> Self {
        self.toasts.push(Toast::error(message));
        self
    }
}

fn blank_form() -> OrderForm {
    OrderForm {
        order_type: OrderType::default().as_str().to_owned(),
        lines: vec![OrderLineForm::default()],
        ..OrderForm::default()
    }
}

/// New order form with one empty line.
#[instrument(skip_all)]
pub async fn new(State(state): State<AppState>, session: Session) -> Response {
    let data = load_form_data(&state).await;
    let mut template = OrderFormTemplate::new(blank_form(), ValidationErrors::new(), data);
    template.toasts = toast::take(&session).await;
    render(&template)
}

/// Re-render the form after adding/removing a line or changing the type.
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let mut form = OrderForm::from_pairs(&pairs);
    if form.lines.is_empty() {
        form.lines.push(OrderLineForm::default());
    }
    let data = load_form_data(&state).await;
    render(&OrderFormTemplate::new(form, ValidationErrors::new(), data))
}

/// Validate, then create the order header followed by each line.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = OrderForm::from_pairs(&pairs);
    let data = load_form_data(&state).await;

    if !data.stock_loaded && form.order_type_value().requires_stock() {
        return render(
            &OrderFormTemplate::new(form, ValidationErrors::new(), data)
                .with_error("Could not check stock levels; try again".to_string()),
        );
    }

    let validated = match validate_order(&form, &data.products, &data.stock) {
        Ok(validated) => validated,
        Err(errors) => return render(&OrderFormTemplate::new(form, errors, data)),
    };

    match state
        .backend()
        .create_order_with_details(&validated.order, &validated.lines)
        .await
    {
        Ok(order_id) => {
            toast::push_success(&session, format!("Order #{order_id} created")).await;
            Redirect::to(&format!("/orders/{order_id}")).into_response()
        }
        Err(e) => {
            if let BackendError::PartialOrder { order_id, .. } = &e {
                tracing::error!(error = %e, "Order saved without all of its lines");
                toast::push_error(&session, e.user_message()).await;
                return Redirect::to(&format!("/orders/{order_id}")).into_response();
            }
            tracing::error!(error = %e, "Failed to create order");
            render(
                &OrderFormTemplate::new(form, ValidationErrors::new(), data)
                    .with_error(e.user_message()),
            )
        }
    }
}
