//! Form parsing and client-side validation.
//!
//! Each form struct mirrors an HTML form: every field arrives as a string
//! and is parsed here into the typed request payload the backend expects.
//! The checks duplicate the backend's rules so users get immediate,
//! field-level feedback; the backend stays authoritative.

mod catalog;
mod inventory;
mod order;
mod user;

pub use catalog::{
    ProductForm, SupplierForm, WarehouseForm, validate_product, validate_supplier,
    validate_warehouse,
};
pub use inventory::{AdjustmentForm, TransferForm, validate_adjustment, validate_transfer};
pub use order::{OrderForm, OrderLineForm, ValidatedOrder, validate_order};
pub use user::{UserForm, validate_new_user, validate_user_update};

use thiserror::Error;

use crate::types::id::parse_id;

/// Field-level validation failures, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    /// First message recorded for `field`.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    /// Every message recorded for `field`.
    #[must_use]
    pub fn all(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
            .collect()
    }

    /// Whether `field` has at least one failure.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|(name, _)| *name == field)
    }

    /// Every `(field, message)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors
            .iter()
            .map(|(name, message)| (*name, message.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(value)` when nothing failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one failure was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Trimmed text, `None` when blank.
pub(crate) fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Required text field.
pub(crate) fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    raw: &str,
) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add(field, format!("{label} is required"));
    }
    trimmed.to_owned()
}

/// Required selection from a dropdown of IDs.
pub(crate) fn required_id<T: From<i64>>(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    raw: &str,
) -> Option<T> {
    if raw.trim().is_empty() {
        errors.add(field, format!("Select a {label}"));
        return None;
    }
    match parse_id(raw) {
        Ok(id) => Some(T::from(id)),
        Err(_) => {
            errors.add(field, format!("Select a valid {label}"));
            None
        }
    }
}

/// Optional selection; blank means none.
pub(crate) fn optional_id<T: From<i64>>(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    raw: &str,
) -> Option<T> {
    if raw.trim().is_empty() {
        return None;
    }
    required_id(errors, field, label, raw)
}

/// Whole number typed into a form.
pub(crate) fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WarehouseId;

    #[test]
    fn test_keeps_insertion_order() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name is required");
        errors.add("price", "Price must not be negative");
        errors.add("name", "Name is too long");

        assert_eq!(errors.first("name"), Some("Name is required"));
        assert_eq!(errors.all("name").len(), 2);
        assert!(errors.has("price"));
        assert!(!errors.has("sku"));
        let fields: Vec<_> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["name", "price", "name"]);
        assert_eq!(errors.to_string(), "3 field(s) failed validation");
    }

    #[test]
    fn test_into_result_depends_on_failures() {
        assert_eq!(ValidationErrors::new().into_result(5), Ok(5));
        let mut errors = ValidationErrors::new();
        errors.add("x", "bad");
        assert!(errors.into_result(5).is_err());
    }

    #[test]
    fn test_id_helpers() {
        let mut errors = ValidationErrors::new();
        assert_eq!(
            required_id::<WarehouseId>(&mut errors, "warehouse_id", "warehouse", " 4 "),
            Some(WarehouseId::new(4))
        );
        assert_eq!(
            optional_id::<WarehouseId>(&mut errors, "warehouse_id", "warehouse", ""),
            None
        );
        assert!(errors.is_empty());

        assert_eq!(
            required_id::<WarehouseId>(&mut errors, "warehouse_id", "warehouse", ""),
            None
        );
        assert_eq!(errors.first("warehouse_id"), Some("Select a warehouse"));
        assert_eq!(
            optional_id::<WarehouseId>(&mut errors, "from", "warehouse", "abc"),
            None
        );
        assert_eq!(errors.first("from"), Some("Select a valid warehouse"));
    }
}
