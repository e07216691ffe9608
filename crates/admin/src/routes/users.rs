//! User management pages.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use depot_core::models::User;
use depot_core::pagination::paginate;
use depot_core::validation::{UserForm, ValidationErrors, validate_new_user, validate_user_update};
use depot_core::{UserId, UserRole};
use tower_sessions::Session;
use tracing::instrument;

use super::{ListQuery, Pager, SelectOption, loaded, matches_search, render};
use crate::{error::AppError, filters, state::AppState, toast, toast::Toast};

/// User row for the list page.
#[derive(Debug, Clone)]
pub struct UserRowView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: &'static str,
    pub is_active: bool,
    pub created_at: String,
}

impl From<&User> for UserRowView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone().unwrap_or_default(),
            role: user.role.label(),
            is_active: user.is_active,
            created_at: user.created_at.clone().unwrap_or_default(),
        }
    }
}

/// Users list template.
#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub search: String,
    pub users: Vec<UserRowView>,
    pub pager: Pager,
}

/// Create/edit user template.
#[derive(Template)]
#[template(path = "users/form.html")]
pub struct UserFormTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    /// `None` when creating.
    pub user_id: Option<UserId>,
    pub form: UserForm,
    pub errors: ValidationErrors,
    pub roles: Vec<SelectOption>,
}

impl UserFormTemplate {
    fn new(user_id: Option<UserId>, form: UserForm, errors: ValidationErrors) -> Self {
        Self {
            current_path: "/users",
            toasts: Vec::new(),
            load_errors: Vec::new(),
            user_id,
            form: form.without_passwords(),
            errors,
            roles: UserRole::ALL
                .iter()
                .map(|r| SelectOption::new(r.as_str(), r.label()))
                .collect(),
        }
    }

    fn with_error(mut self, message: String) -> Self {
        self.toasts.push(Toast::error(message));
        self
    }
}

/// Users list page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Response {
    let mut load_errors = Vec::new();
    let mut users = loaded(state.backend().list_users().await, "users", &mut load_errors);

    let search = query.search();
    users.retain(|u| {
        matches_search(
            search,
            &[
                u.username.as_str(),
                u.email.as_str(),
                u.full_name.as_deref().unwrap_or_default(),
            ],
        )
    });
    users.sort_by(|a, b| a.username.to_lowercase().cmp(&b.username.to_lowercase()));

    let page = paginate(users, query.page(), state.config().page_size);
    let pager = Pager::new(&page, "/users", &[("q", search)]);

    let template = UsersIndexTemplate {
        current_path: "/users",
        toasts: toast::take(&session).await,
        load_errors,
        search: search.unwrap_or_default().to_string(),
        users: page.items.iter().map(UserRowView::from).collect(),
        pager,
    };
    render(&template)
}

/// New user form.
#[instrument(skip_all)]
pub async fn new(session: Session) -> Response {
    let mut template = UserFormTemplate::new(None, UserForm::blank(), ValidationErrors::new());
    template.toasts = toast::take(&session).await;
    render(&template)
}

/// Create a user.
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UserForm>,
) -> Response {
    let user = match validate_new_user(&form) {
        Ok(user) => user,
        Err(errors) => return render(&UserFormTemplate::new(None, form, errors)),
    };

    match state.backend().create_user(&user).await {
        Ok(()) => {
            tracing::info!(username = %user.username, role = %user.role, "User created");
            toast::push_success(&session, format!("User {} created", user.username)).await;
            Redirect::to("/users").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create user");
            render(
                &UserFormTemplate::new(None, form, ValidationErrors::new())
                    .with_error(e.user_message()),
            )
        }
    }
}

/// Edit user form.
#[instrument(skip(state, session))]
pub async fn edit(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<UserId>,
) -> Result<Response, AppError> {
    let user = state.backend().get_user(id).await?;
    let mut template =
        UserFormTemplate::new(Some(id), UserForm::from(&user), ValidationErrors::new());
    template.toasts = toast::take(&session).await;
    Ok(render(&template))
}

/// Update a user. A blank password keeps the current one.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<UserId>,
    Form(form): Form<UserForm>,
) -> Response {
    let update = match validate_user_update(&form) {
        Ok(update) => update,
        Err(errors) => return render(&UserFormTemplate::new(Some(id), form, errors)),
    };

    match state.backend().update_user(id, &update).await {
        Ok(()) => {
            tracing::info!(user_id = %id, "User updated");
            toast::push_success(&session, format!("User {} updated", update.username)).await;
            Redirect::to("/users").into_response()
        }
        Err(e) => {
            tracing::error!(user_id = %id, error = %e, "Failed to update user");
            render(
                &UserFormTemplate::new(Some(id), form, ValidationErrors::new())
                    .with_error(e.user_message()),
            )
        }
    }
}

/// Delete a user.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<UserId>,
) -> Redirect {
    match state.backend().delete_user(id).await {
        Ok(()) => {
            tracing::info!(user_id = %id, "User deleted");
            toast::push_success(&session, "User deleted").await;
        }
        Err(e) => {
            tracing::error!(user_id = %id, error = %e, "Failed to delete user");
            toast::push_error(&session, e.user_message()).await;
        }
    }
    Redirect::to("/users")
}
