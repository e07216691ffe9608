//! Supplier pages.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use depot_core::SupplierId;
use depot_core::models::{Product, Supplier};
use depot_core::pagination::paginate;
use depot_core::validation::{SupplierForm, ValidationErrors, validate_supplier};
use tower_sessions::Session;
use tracing::instrument;

use super::{ListQuery, Pager, loaded, matches_search, render};
use crate::{error::AppError, filters, state::AppState, toast, toast::Toast};

/// Supplier row for the list page.
#[derive(Debug, Clone)]
pub struct SupplierRowView {
    pub id: SupplierId,
    pub name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub product_count: usize,
}

impl SupplierRowView {
    fn new(supplier: &Supplier, products: &[Product]) -> Self {
        Self {
            id: supplier.id,
            name: supplier.name.clone(),
            contact_name: supplier.contact_name.clone().unwrap_or_default(),
            email: supplier.email.clone().unwrap_or_default(),
            phone: supplier.phone.clone().unwrap_or_default(),
            product_count: products
                .iter()
                .filter(|p| p.supplier_id == Some(supplier.id))
                .count(),
        }
    }
}

/// Suppliers list template.
#[derive(Template)]
#[template(path = "suppliers/index.html")]
pub struct SuppliersIndexTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub search: String,
    pub suppliers: Vec<SupplierRowView>,
    pub pager: Pager,
}

/// Create/edit supplier template.
#[derive(Template)]
#[template(path = "suppliers/form.html")]
pub struct SupplierFormTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub supplier_id: Option<SupplierId>,
    pub form: SupplierForm,
    pub errors: ValidationErrors,
}

impl SupplierFormTemplate {
    fn new(supplier_id: Option<SupplierId>, form: SupplierForm, errors: ValidationErrors) -> Self {
        Self {
            current_path: "/suppliers",
            toasts: Vec::new(),
            load_errors: Vec::new(),
            supplier_id,
            form,
            errors,
        }
    }

    fn with_error(mut self, message: String) -> Self {
        self.toasts.push(Toast::error(message));
        self
    }
}

/// Suppliers list page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Response {
    let backend = state.backend();
    let (suppliers, products) = tokio::join!(backend.list_suppliers(), backend.list_products());

    let mut load_errors = Vec::new();
    let mut suppliers = loaded(suppliers, "suppliers", &mut load_errors);
    let products = loaded(products, "products", &mut load_errors);

    let search = query.search();
    suppliers.retain(|s| {
        matches_search(
            search,
            &[
                s.name.as_str(),
                s.contact_name.as_deref().unwrap_or_default(),
                s.email.as_deref().unwrap_or_default(),
            ],
        )
    });
    suppliers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let page = paginate(suppliers, query.page(), state.config().page_size);
    let pager = Pager::new(&page, "/suppliers", &[("q", search)]);

    let template = SuppliersIndexTemplate {
        current_path: "/suppliers",
        toasts: toast::take(&session).await,
        load_errors,
        search: search.unwrap_or_default().to_string(),
        suppliers: page
            .items
            .iter()
            .map(|s| SupplierRowView::new(s, &products))
            .collect(),
        pager,
    };
    render(&template)
}

/// New supplier form.
#[instrument(skip_all)]
pub async fn new(session: Session) -> Response {
    let mut template =
        SupplierFormTemplate::new(None, SupplierForm::default(), ValidationErrors::new());
    template.toasts = toast::take(&session).await;
    render(&template)
}

/// Create a supplier.
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SupplierForm>,
) -> Response {
    let input = match validate_supplier(&form) {
        Ok(input) => input,
        Err(errors) => return render(&SupplierFormTemplate::new(None, form, errors)),
    };

    match state.backend().create_supplier(&input).await {
        Ok(()) => {
            tracing::info!(name = %input.name, "Supplier created");
            toast::push_success(&session, format!("Supplier {} created", input.name)).await;
            Redirect::to("/suppliers").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create supplier");
            render(
                &SupplierFormTemplate::new(None, form, ValidationErrors::new())
                    .with_error(e.user_message()),
            )
        }
    }
}

/// Edit supplier form.
#[instrument(skip(state, session))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<SupplierId>,
) -> Result<Response, AppError> {
    let supplier = state.backend().get_supplier(id).await?;
    let mut template = SupplierFormTemplate::new(
        Some(id),
        SupplierForm::from(&supplier),
        ValidationErrors::new(),
    );
    template.toasts = toast::take(&session).await;
    Ok(render(&template))
}

/// Update a supplier.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<SupplierId>,
    Form(form): Form<SupplierForm>,
) -> Response {
    let input = match validate_supplier(&form) {
        Ok(input) => input,
        Err(errors) => return render(&SupplierFormTemplate::new(Some(id), form, errors)),
    };

    match state.backend().update_supplier(id, &input).await {
        Ok(()) => {
            tracing::info!(supplier_id = %id, "Supplier updated");
            toast::push_success(&session, format!("Supplier {} updated", input.name)).await;
            Redirect::to("/suppliers").into_response()
        }
        Err(e) => {
            tracing::error!(supplier_id = %id, error = %e, "Failed to update supplier");
            render(
                &SupplierFormTemplate::new(Some(id), form, ValidationErrors::new())
                    .with_error(e.user_message()),
            )
        }
    }
}

/// Delete a supplier.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<SupplierId>,
) -> Redirect {
    match state.backend().delete_supplier(id).await {
        Ok(()) => {
            tracing::info!(supplier_id = %id, "Supplier deleted");
            toast::push_success(&session, "Supplier deleted").await;
        }
        Err(e) => {
            tracing::error!(supplier_id = %id, error = %e, "Failed to delete supplier");
            toast::push_error(&session, e.user_message()).await;
        }
    }
    Redirect::to("/suppliers")
}
