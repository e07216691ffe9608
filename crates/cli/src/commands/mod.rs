//! Subcommand implementations.
//!
//! Every command validates its input with the same rules as the dashboard
//! before calling the backend.

pub mod alerts;
pub mod inventory;
pub mod report;
pub mod transfer;

use depot_admin::backend::BackendError;
use depot_admin::config::ConfigError;
use depot_core::validation::ValidationErrors;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or malformed connection settings.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend failed or rejected the request.
    #[error("{}", .0.user_message())]
    Backend(#[from] BackendError),

    /// Input failed validation before anything was sent.
    #[error("{}", describe(.0))]
    Invalid(ValidationErrors),

    /// Output could not be serialized.
    #[error("Could not encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationErrors> for CliError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

/// Flatten validation errors into one line, using CLI flag names.
fn describe(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("--{}: {message}", flag_name(field)))
        .collect::<Vec<_>>()
        .join("; ")
}

fn flag_name(field: &str) -> &str {
    match field {
        "product_id" => "product",
        "warehouse_id" => "warehouse",
        "from_warehouse_id" => "from",
        "to_warehouse_id" => "to",
        _ => field,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_use_flag_names() {
        let mut errors = ValidationErrors::new();
        errors.add("to_warehouse_id", "Destination must differ from the source warehouse");
        errors.add("quantity", "Only 3 available at the source warehouse");
        assert_eq!(
            CliError::from(errors).to_string(),
            "--to: Destination must differ from the source warehouse; \
             --quantity: Only 3 available at the source warehouse"
        );
    }

    #[test]
    fn test_backend_errors_show_user_message() {
        let err = CliError::from(BackendError::Api {
            status: 422,
            message: "Not enough stock".into(),
        });
        assert_eq!(err.to_string(), "Not enough stock");
    }
}
