//! Stock transfer pages.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use depot_core::models::{Product, StockTransfer, Warehouse};
use depot_core::pagination::paginate;
use depot_core::stock::StockIndex;
use depot_core::validation::{TransferForm, ValidationErrors, validate_transfer};
use depot_core::{TransferId, TransferStatus};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{
    Names, Pager, SelectOption, loaded, non_blank, parse_page, product_options, render,
    warehouse_options,
};
use crate::{
    components::data_table::{DataTableConfig, transfers_table_config},
    error::AppError,
    filters,
    state::AppState,
    toast,
    toast::Toast,
};

/// A transfer row with resolved names and the actions its status allows.
#[derive(Debug, Clone)]
pub struct TransferView {
    pub id: TransferId,
    pub product: String,
    pub from: String,
    pub to: String,
    pub quantity: i64,
    pub status: String,
    pub status_class: &'static str,
    pub note: String,
    pub created_at: String,
    pub can_approve: bool,
    pub can_reject: bool,
    pub can_complete: bool,
}

impl TransferView {
    pub(crate) fn new(transfer: &StockTransfer, names: &Names) -> Self {
        let status = transfer.status;
        Self {
            id: transfer.id,
            product: names.product(transfer.product_id),
            from: names.warehouse(transfer.from_warehouse_id),
            to: names.warehouse(transfer.to_warehouse_id),
            quantity: transfer.quantity,
            status: status.label().to_string(),
            status_class: match status {
                TransferStatus::Pending => "badge-warning",
                TransferStatus::Approved => "badge-info",
                TransferStatus::Rejected => "badge-muted",
                TransferStatus::Completed => "badge-success",
            },
            note: transfer.note.clone().unwrap_or_default(),
            created_at: transfer.created_at.clone().unwrap_or_default(),
            can_approve: status.can_transition_to(TransferStatus::Approved),
            can_reject: status.can_transition_to(TransferStatus::Rejected),
            can_complete: status.can_transition_to(TransferStatus::Completed),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TransfersQuery {
    pub status: Option<String>,
    pub page: Option<String>,
}

/// Transfers list template.
#[derive(Template)]
#[template(path = "transfers/index.html")]
pub struct TransfersIndexTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub table: DataTableConfig,
    pub transfers: Vec<TransferView>,
    pub pager: Pager,
}

/// Transfer request form template.
#[derive(Template)]
#[template(path = "transfers/form.html")]
pub struct TransferFormTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub form: TransferForm,
    pub errors: ValidationErrors,
    pub products: Vec<SelectOption>,
    pub warehouses: Vec<SelectOption>,
}

impl TransferFormTemplate {
    fn new(
        form: TransferForm,
        errors: ValidationErrors,
        products: &[Product],
        warehouses: &[Warehouse],
    ) -> Self {
        Self {
            current_path: "/transfers",
            toasts: Vec::new(),
            load_errors: Vec::new(),
            form,
            errors,
            products: product_options(products),
            warehouses: warehouse_options(warehouses),
        }
    }
}

/// Transfers list, newest first.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<TransfersQuery>,
) -> Response {
    let backend = state.backend();
    let (transfers, products, warehouses) = tokio::join!(
        backend.list_transfers(),
        backend.list_products(),
        backend.list_warehouses(),
    );

    let mut load_errors = Vec::new();
    let mut transfers = loaded(transfers, "transfers", &mut load_errors);
    let products = loaded(products, "products", &mut load_errors);
    let warehouses = loaded(warehouses, "warehouses", &mut load_errors);
    let names = Names::new(&products, &warehouses, &[]);

    let status = non_blank(query.status.as_ref()).and_then(|s| s.parse::<TransferStatus>().ok());
    if let Some(status) = status {
        transfers.retain(|t| t.status == status);
    }
    transfers.sort_by(|a, b| b.id.cmp(&a.id));

    let page = paginate(transfers, parse_page(query.page.as_ref()), state.config().page_size);
    let status_param = status.map(TransferStatus::as_str);
    let pager = Pager::new(&page, "/transfers", &[("status", status_param)]);

    let template = TransfersIndexTemplate {
        current_path: "/transfers",
        toasts: toast::take(&session).await,
        load_errors,
        table: transfers_table_config().selected("status", status_param),
        transfers: page.items.iter().map(|t| TransferView::new(t, &names)).collect(),
        pager,
    };
    render(&template)
}

/// Transfer request form.
#[instrument(skip_all)]
pub async fn new(State(state): State<AppState>, session: Session) -> Response {
    let backend = state.backend();
    let (products, warehouses) = tokio::join!(backend.list_products(), backend.list_warehouses());

    let mut load_errors = Vec::new();
    let products = loaded(products, "products", &mut load_errors);
    let warehouses = loaded(warehouses, "warehouses", &mut load_errors);

    let mut template = TransferFormTemplate::new(
        TransferForm::default(),
        ValidationErrors::new(),
        &products,
        &warehouses,
    );
    template.toasts = toast::take(&session).await;
    template.load_errors = load_errors;
    render(&template)
}

/// Validate against current stock and request the transfer.
#[instrument(skip(state, session, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<TransferForm>,
) -> Response {
    let backend = state.backend();
    let (products, warehouses, stock) = tokio::join!(
        backend.list_products(),
        backend.list_warehouses(),
        backend.stock(None),
    );

    let mut load_errors = Vec::new();
    let products = loaded(products, "products", &mut load_errors);
    let warehouses = loaded(warehouses, "warehouses", &mut load_errors);
    let stock = match stock {
        Ok(stock) => stock,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch stock for transfer validation");
            let mut template =
                TransferFormTemplate::new(form, ValidationErrors::new(), &products, &warehouses);
            template.toasts = vec![Toast::error(format!(
                "Could not check available stock: {}",
                e.user_message()
            ))];
            template.load_errors = load_errors;
            return render(&template);
        }
    };

    let transfer = match validate_transfer(&form, &StockIndex::from_rows(&stock)) {
        Ok(transfer) => transfer,
        Err(errors) => {
            let mut template = TransferFormTemplate::new(form, errors, &products, &warehouses);
            template.load_errors = load_errors;
            return render(&template);
        }
    };

    match backend.create_transfer(&transfer).await {
        Ok(()) => {
            tracing::info!(
                product_id = %transfer.product_id,
                from = %transfer.from_warehouse_id,
                to = %transfer.to_warehouse_id,
                quantity = transfer.quantity,
                "Transfer requested"
            );
            toast::push_success(&session, "Transfer requested").await;
            Redirect::to("/transfers").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create transfer");
            let mut template =
                TransferFormTemplate::new(form, ValidationErrors::new(), &products, &warehouses);
            template.toasts = vec![Toast::error(e.user_message())];
            render(&template)
        }
    }
}

/// Approve, reject or complete a transfer.
#[instrument(skip(state, session))]
pub async fn transition(
    State(state): State<AppState>,
    session: Session,
    Path((id, action)): Path<(TransferId, String)>,
) -> Result<Redirect, AppError> {
    let backend = state.backend();
    let (result, done) = match action.as_str() {
        "approve" => (backend.approve_transfer(id).await, "approved"),
        "reject" => (backend.reject_transfer(id).await, "rejected"),
        "complete" => (backend.complete_transfer(id).await, "completed"),
        _ => return Err(AppError::NotFound(format!("transfer action {action}"))),
    };

    match result {
        Ok(()) => {
            tracing::info!(transfer_id = %id, action = %action, "Transfer updated");
            toast::push_success(&session, format!("Transfer #{id} {done}")).await;
        }
        Err(e) => {
            tracing::error!(transfer_id = %id, action = %action, error = %e, "Transfer action failed");
            toast::push_error(&session, e.user_message()).await;
        }
    }
    Ok(Redirect::to("/transfers"))
}
