//! Warehouse pages.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use depot_core::WarehouseId;
use depot_core::models::Warehouse;
use depot_core::pagination::paginate;
use depot_core::stock::StockIndex;
use depot_core::validation::{ValidationErrors, WarehouseForm, validate_warehouse};
use tower_sessions::Session;
use tracing::instrument;

use super::{ListQuery, Pager, loaded, matches_search, render};
use crate::{error::AppError, filters, state::AppState, toast, toast::Toast};

/// Warehouse row for the list page.
#[derive(Debug, Clone)]
pub struct WarehouseRowView {
    pub id: WarehouseId,
    pub name: String,
    pub address: String,
    pub manager: String,
    pub capacity: String,
    pub on_hand: i64,
    /// Percentage of capacity in use, blank without a capacity.
    pub utilization: String,
}

impl WarehouseRowView {
    fn new(warehouse: &Warehouse, index: &StockIndex) -> Self {
        let on_hand = index.total_for_warehouse(warehouse.id);
        Self {
            id: warehouse.id,
            name: warehouse.name.clone(),
            address: warehouse.address.clone().unwrap_or_default(),
            manager: warehouse.manager.clone().unwrap_or_default(),
            capacity: warehouse
                .capacity
                .map(|c| c.to_string())
                .unwrap_or_default(),
            on_hand,
            utilization: warehouse
                .capacity
                .filter(|c| *c > 0)
                .map(|c| format!("{}%", on_hand.saturating_mul(100) / c))
                .unwrap_or_default(),
        }
    }
}

/// Warehouses list template.
#[derive(Template)]
#[template(path = "warehouses/index.html")]
pub struct WarehousesIndexTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub search: String,
    pub warehouses: Vec<WarehouseRowView>,
    pub pager: Pager,
}

/// Create/edit warehouse template.
#[derive(Template)]
#[template(path = "warehouses/form.html")]
pub struct WarehouseFormTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub warehouse_id: Option<WarehouseId>,
    pub form: WarehouseForm,
    pub errors: ValidationErrors,
}

impl WarehouseFormTemplate {
    fn new(
        warehouse_id: Option<WarehouseId>,
        form: WarehouseForm,
        errors: ValidationErrors,
    ) -> Self {
        Self {
            current_path: "/warehouses",
            toasts: Vec::new(),
            load_errors: Vec::new(),
            warehouse_id,
            form,
            errors,
        }
    }

    fn with_error(mut self, message: String) -> Self {
        self.toasts.push(Toast::error(message));
        self
    }
}

/// Warehouses list page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Response {
    let backend = state.backend();
    let (warehouses, stock) = tokio::join!(backend.list_warehouses(), backend.stock(None));

    let mut load_errors = Vec::new();
    let mut warehouses = loaded(warehouses, "warehouses", &mut load_errors);
    let stock = loaded(stock, "stock levels", &mut load_errors);
    let index = StockIndex::from_rows(&stock);

    let search = query.search();
    warehouses.retain(|w| {
        matches_search(
            search,
            &[
                w.name.as_str(),
                w.address.as_deref().unwrap_or_default(),
                w.manager.as_deref().unwrap_or_default(),
            ],
        )
    });

    let page = paginate(warehouses, query.page(), state.config().page_size);
    let pager = Pager::new(&page, "/warehouses", &[("q", search)]);

    let template = WarehousesIndexTemplate {
        current_path: "/warehouses",
        toasts: toast::take(&session).await,
        load_errors,
        search: search.unwrap_or_default().to_string(),
        warehouses: page
            .items
            .iter()
            .map(|w| WarehouseRowView::new(w, &index))
            .collect(),
        pager,
    };
    render(&template)
}

/// New warehouse form.
#[instrument(skip_all)]
pub async fn new(session: Session) -> Response {
    let mut template =
        WarehouseFormTemplate::new(None, WarehouseForm::default(), ValidationErrors::new());
    template.toasts = toast::take(&session).await;
    render(&template)
}

/// Create a warehouse.
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<WarehouseForm>,
) -> Response {
    let input = match validate_warehouse(&form) {
        Ok(input) => input,
        Err(errors) => return render(&WarehouseFormTemplate::new(None, form, errors)),
    };

    match state.backend().create_warehouse(&input).await {
        Ok(()) => {
            tracing::info!(name = %input.name, "Warehouse created");
            toast::push_success(&session, format!("Warehouse {} created", input.name)).await;
            Redirect::to("/warehouses").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create warehouse");
            render(
                &WarehouseFormTemplate::new(None, form, ValidationErrors::new())
                    .with_error(e.user_message()),
            )
        }
    }
}

/// Edit warehouse form.
#[instrument(skip(state, session))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<WarehouseId>,
) -> Result<Response, AppError> {
    let warehouse = state.backend().get_warehouse(id).await?;
    let mut template = WarehouseFormTemplate::new(
        Some(id),
        WarehouseForm::from(&warehouse),
        ValidationErrors::new(),
    );
    template.toasts = toast::take(&session).await;
    Ok(render(&template))
}

/// Update a warehouse.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<WarehouseId>,
    Form(form): Form<WarehouseForm>,
) -> Response {
    let input = match validate_warehouse(&form) {
        Ok(input) => input,
        Err(errors) => return render(&WarehouseFormTemplate::new(Some(id), form, errors)),
    };

    match state.backend().update_warehouse(id, &input).await {
        Ok(()) => {
            tracing::info!(warehouse_id = %id, "Warehouse updated");
            toast::push_success(&session, format!("Warehouse {} updated", input.name)).await;
            Redirect::to("/warehouses").into_response()
        }
        Err(e) => {
            tracing::error!(warehouse_id = %id, error = %e, "Failed to update warehouse");
            render(
                &WarehouseFormTemplate::new(Some(id), form, ValidationErrors::new())
                    .with_error(e.user_message()),
            )
        }
    }
}

/// Delete a warehouse.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<WarehouseId>,
) -> Redirect {
    match state.backend().delete_warehouse(id).await {
        Ok(()) => {
            tracing::info!(warehouse_id = %id, "Warehouse deleted");
            toast::push_success(&session, "Warehouse deleted").await;
        }
        Err(e) => {
            tracing::error!(warehouse_id = %id, error = %e, "Failed to delete warehouse");
            toast::push_error(&session, e.user_message()).await;
        }
    }
    Redirect::to("/warehouses")
}
