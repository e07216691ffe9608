//! Product catalog pages.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use depot_core::models::{Product, Supplier};
use depot_core::pagination::paginate;
use depot_core::stock::{StockIndex, filter_products};
use depot_core::validation::{ProductForm, ValidationErrors, validate_product};
use depot_core::{ProductId, SupplierId, format_money};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{Names, Pager, SelectOption, loaded, non_blank, parse_page, render, supplier_options};
use crate::{error::AppError, filters, state::AppState, toast, toast::Toast};

/// Query parameters for the product list.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    pub q: Option<String>,
    pub supplier_id: Option<String>,
    pub page: Option<String>,
}

/// Product row for the list page.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub unit: String,
    pub price: String,
    pub supplier: String,
    pub reorder_level: String,
    pub on_hand: i64,
}

/// Products list template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub search: String,
    pub supplier_id: String,
    pub suppliers: Vec<SelectOption>,
    pub products: Vec<ProductRowView>,
    pub pager: Pager,
}

/// Create/edit product template.
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub product_id: Option<ProductId>,
    pub form: ProductForm,
    pub errors: ValidationErrors,
    pub suppliers: Vec<SelectOption>,
}

impl ProductFormTemplate {
    fn new(
        product_id: Option<ProductId>,
        form: ProductForm,
        errors: ValidationErrors,
        suppliers: &[Supplier],
    ) -> Self {
        Self {
            current_path: "/products",
            toasts: Vec::new(),
            load_errors: Vec::new(),
            product_id,
            form,
            errors,
            suppliers: supplier_options(suppliers),
        }
    }

    fn with_error(mut self, message: String) -> Self {
        self.toasts.push(Toast::error(message));
        self
    }
}

/// Suppliers for the form dropdown; a failure leaves the dropdown empty.
async fn form_suppliers(state: &AppState, load_errors: &mut Vec<String>) -> Vec<Supplier> {
    loaded(state.backend().list_suppliers().await, "suppliers", load_errors)
}

/// Products list page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ProductsQuery>,
) -> Response {
    let backend = state.backend();
    let (products, suppliers, stock) = tokio::join!(
        backend.list_products(),
        backend.list_suppliers(),
        backend.stock(None),
    );

    let mut load_errors = Vec::new();
    let products = loaded(products, "products", &mut load_errors);
    let suppliers = loaded(suppliers, "suppliers", &mut load_errors);
    let stock = loaded(stock, "stock levels", &mut load_errors);
    let names = Names::new(&[], &[], &suppliers);
    let index = StockIndex::from_rows(&stock);

    let search = non_blank(query.q.as_ref());
    let supplier = non_blank(query.supplier_id.as_ref()).and_then(|s| s.parse::<SupplierId>().ok());
    let mut matching: Vec<&Product> = filter_products(&products, search.unwrap_or_default());
    if let Some(supplier) = supplier {
        matching.retain(|p| p.supplier_id == Some(supplier));
    }
    matching.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let page = paginate(matching, parse_page(query.page.as_ref()), state.config().page_size);
    let supplier_param = supplier.map(|s| s.to_string());
    let pager = Pager::new(
        &page,
        "/products",
        &[("q", search), ("supplier_id", supplier_param.as_deref())],
    );

    let rows = page
        .items
        .iter()
        .map(|p| ProductRowView {
            id: p.id,
            name: p.name.clone(),
            sku: p.sku.clone(),
            unit: p.unit.clone().unwrap_or_default(),
            price: format_money(p.price),
            supplier: p.supplier_id.map(|s| names.supplier(s)).unwrap_or_default(),
            reorder_level: p.reorder_level.map(|l| l.to_string()).unwrap_or_default(),
            on_hand: index.total_for_product(p.id),
        })
        .collect();

    let template = ProductsIndexTemplate {
        current_path: "/products",
        toasts: toast::take(&session).await,
        load_errors,
        search: search.unwrap_or_default().to_string(),
        supplier_id: supplier_param.unwrap_or_default(),
        suppliers: supplier_options(&suppliers),
        products: rows,
        pager,
    };
    render(&template)
}

/// New product form.
#[instrument(skip_all)]
pub async fn new(State(state): State<AppState>, session: Session) -> Response {
    let mut load_errors = Vec::new();
    let suppliers = form_suppliers(&state, &mut load_errors).await;
    let mut template =
        ProductFormTemplate::new(None, ProductForm::default(), ValidationErrors::new(), &suppliers);
    template.toasts = toast::take(&session).await;
    template.load_errors = load_errors;
    render(&template)
}

/// Create a product.
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Response {
    let input = match validate_product(&form) {
        Ok(input) => input,
        Err(errors) => {
            let mut load_errors = Vec::new();
            let suppliers = form_suppliers(&state, &mut load_errors).await;
            return render(&ProductFormTemplate::new(None, form, errors, &suppliers));
        }
    };

    match state.backend().create_product(&input).await {
        Ok(()) => {
            tracing::info!(sku = %input.sku, "Product created");
            toast::push_success(&session, format!("Product {} created", input.name)).await;
            Redirect::to("/products").into_response()
        }
        Err(e) => {
            tracing::error!(sku = %input.sku, error = %e, "Failed to create product");
            let mut load_errors = Vec::new();
            let suppliers = form_suppliers(&state, &mut load_errors).await;
            render(
                &ProductFormTemplate::new(None, form, ValidationErrors::new(), &suppliers)
                    .with_error(e.user_message()),
            )
        }
    }
}

/// Edit product form.
#[instrument(skip(state, session))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Response, AppError> {
    let backend = state.backend();
    let (product, suppliers) = tokio::join!(backend.get_product(id), backend.list_suppliers());
    let product = product?;
    let mut load_errors = Vec::new();
    let suppliers = loaded(suppliers, "suppliers", &mut load_errors);

    let mut template = ProductFormTemplate::new(
        Some(id),
        ProductForm::from(&product),
        ValidationErrors::new(),
        &suppliers,
    );
    template.toasts = toast::take(&session).await;
    template.load_errors = load_errors;
    Ok(render(&template))
}

/// Update a product.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> Response {
    let input = match validate_product(&form) {
        Ok(input) => input,
        Err(errors) => {
            let mut load_errors = Vec::new();
            let suppliers = form_suppliers(&state, &mut load_errors).await;
            return render(&ProductFormTemplate::new(Some(id), form, errors, &suppliers));
        }
    };

    match state.backend().update_product(id, &input).await {
        Ok(()) => {
            tracing::info!(product_id = %id, "Product updated");
            toast::push_success(&session, format!("Product {} updated", input.name)).await;
            Redirect::to("/products").into_response()
        }
        Err(e) => {
            tracing::error!(product_id = %id, error = %e, "Failed to update product");
            let mut load_errors = Vec::new();
            let suppliers = form_suppliers(&state, &mut load_errors).await;
            render(
                &ProductFormTemplate::new(Some(id), form, ValidationErrors::new(), &suppliers)
                    .with_error(e.user_message()),
            )
        }
    }
}

/// Delete a product.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Redirect {
    match state.backend().delete_product(id).await {
        Ok(()) => {
            tracing::info!(product_id = %id, "Product deleted");
            toast::push_success(&session, "Product deleted").await;
        }
        Err(e) => {
            tracing::error!(product_id = %id, error = %e, "Failed to delete product");
            toast::push_error(&session, e.user_message()).await;
        }
    }
    Redirect::to("/products")
}
