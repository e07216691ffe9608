//! User account endpoints (`/users`).

use depot_core::UserId;
use depot_core::models::{NewUser, User, UserUpdate};
use reqwest::Method;
use tracing::instrument;

use super::{BackendClient, BackendError};

impl BackendClient {
    /// List every user.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, BackendError> {
        self.get_json("users").await
    }

    /// Fetch one user.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::NotFound` if the user does not exist.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: UserId) -> Result<User, BackendError> {
        self.get_json(&format!("users/{id}")).await
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend rejects the user.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn create_user(&self, user: &NewUser) -> Result<(), BackendError> {
        self.send_json_unit(Method::POST, "users", user).await
    }

    /// Update a user; the password is only sent when set.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend rejects the update.
    #[instrument(skip(self, user), fields(user_id = %id))]
    pub async fn update_user(&self, id: UserId, user: &UserUpdate) -> Result<(), BackendError> {
        self.send_json_unit(Method::PUT, &format!("users/{id}"), user)
            .await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend refuses the deletion.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<(), BackendError> {
        self.delete(&format!("users/{id}")).await
    }
}
