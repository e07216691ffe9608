use rust_decimal::Decimal;
use serde::Deserialize;

use super::{ValidationErrors, optional_id, optional_text, parse_integer, required_text};
use crate::models::{Product, ProductInput, Supplier, SupplierInput, Warehouse, WarehouseInput};
use crate::types::{Email, MoneyError, parse_money};

/// Create/edit product form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub sku: String,
    pub description: String,
    pub unit: String,
    pub price: String,
    pub supplier_id: String,
    pub reorder_level: String,
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            sku: product.sku.clone(),
            description: product.description.clone().unwrap_or_default(),
            unit: product.unit.clone().unwrap_or_default(),
            price: format!("{:.2}", product.price),
            supplier_id: product
                .supplier_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            reorder_level: product
                .reorder_level
                .map(|level| level.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Validate the product form.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_product(form: &ProductForm) -> Result<ProductInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = required_text(&mut errors, "name", "Name", &form.name);
    let sku = required_text(&mut errors, "sku", "SKU", &form.sku);

    let price = match parse_money(&form.price) {
        Ok(price) if price.is_sign_negative() && !price.is_zero() => {
            errors.add("price", "Price cannot be negative");
            Decimal::ZERO
        }
        Ok(price) => price,
        Err(MoneyError::Empty) => {
            errors.add("price", "Price is required");
            Decimal::ZERO
        }
        Err(MoneyError::Invalid(_)) => {
            errors.add("price", "Price must be a number");
            Decimal::ZERO
        }
    };

    let reorder_level = if form.reorder_level.trim().is_empty() {
        None
    } else {
        match parse_integer(&form.reorder_level) {
            Some(level) if level >= 0 => Some(level),
            Some(_) => {
                errors.add("reorder_level", "Reorder level cannot be negative");
                None
            }
            None => {
                errors.add("reorder_level", "Reorder level must be a whole number");
                None
            }
        }
    };

    let supplier_id = optional_id(&mut errors, "supplier_id", "supplier", &form.supplier_id);

    errors.into_result(ProductInput {
        name,
        sku,
        description: optional_text(&form.description),
        unit: optional_text(&form.unit),
        price,
        supplier_id,
        reorder_level,
    })
}

/// Create/edit warehouse form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WarehouseForm {
    pub name: String,
    pub address: String,
    pub capacity: String,
    pub manager: String,
}

impl From<&Warehouse> for WarehouseForm {
    fn from(warehouse: &Warehouse) -> Self {
        Self {
            name: warehouse.name.clone(),
            address: warehouse.address.clone().unwrap_or_default(),
            capacity: warehouse
                .capacity
                .map(|c| c.to_string())
                .unwrap_or_default(),
            manager: warehouse.manager.clone().unwrap_or_default(),
        }
    }
}

/// Validate the warehouse form.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_warehouse(form: &WarehouseForm) -> Result<WarehouseInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = required_text(&mut errors, "name", "Name", &form.name);
    let capacity = if form.capacity.trim().is_empty() {
        None
    } else {
        match parse_integer(&form.capacity) {
            Some(capacity) if capacity > 0 => Some(capacity),
            _ => {
                errors.add("capacity", "Capacity must be a whole number above zero");
                None
            }
        }
    };
    errors.into_result(WarehouseInput {
        name,
        address: optional_text(&form.address),
        capacity,
        manager: optional_text(&form.manager),
    })
}

/// Create/edit supplier form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SupplierForm {
    pub name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl From<&Supplier> for SupplierForm {
    fn from(supplier: &Supplier) -> Self {
        Self {
            name: supplier.name.clone(),
            contact_name: supplier.contact_name.clone().unwrap_or_default(),
            email: supplier.email.clone().unwrap_or_default(),
            phone: supplier.phone.clone().unwrap_or_default(),
            address: supplier.address.clone().unwrap_or_default(),
        }
    }
}

/// Validate the supplier form.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_supplier(form: &SupplierForm) -> Result<SupplierInput, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = required_text(&mut errors, "name", "Name", &form.name);
    let email = optional_text(&form.email);
    if let Some(raw) = &email
        && Email::parse(raw).is_err()
    {
        errors.add("email", "Enter a valid email address");
    }
    errors.into_result(SupplierInput {
        name,
        contact_name: optional_text(&form.contact_name),
        email,
        phone: optional_text(&form.phone),
        address: optional_text(&form.address),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::SupplierId;
    use std::str::FromStr;

    fn product_form() -> ProductForm {
        ProductForm {
            name: "Bolt".into(),
            sku: "B-1".into(),
            price: "$1,250.50".into(),
            supplier_id: "3".into(),
            reorder_level: "5".into(),
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_parses_product() {
        let input = validate_product(&product_form()).unwrap();
        assert_eq!(input.price, Decimal::from_str("1250.50").unwrap());
        assert_eq!(input.supplier_id, Some(SupplierId::new(3)));
        assert_eq!(input.reorder_level, Some(5));
        assert_eq!(input.description, None);
    }

    #[test]
    fn test_product_requires_name_sku_and_price() {
        let errors = validate_product(&ProductForm::default()).unwrap_err();
        assert_eq!(errors.first("name"), Some("Name is required"));
        assert_eq!(errors.first("sku"), Some("SKU is required"));
        assert_eq!(errors.first("price"), Some("Price is required"));
    }

    #[test]
    fn test_product_rejects_negative_numbers() {
        let form = ProductForm {
            price: "-1".into(),
            reorder_level: "-2".into(),
            ..product_form()
        };
        let errors = validate_product(&form).unwrap_err();
        assert_eq!(errors.first("price"), Some("Price cannot be negative"));
        assert!(errors.has("reorder_level"));
    }

    #[test]
    fn test_zero_price_is_allowed() {
        let form = ProductForm {
            price: "0".into(),
            ..product_form()
        };
        assert!(validate_product(&form).is_ok());
    }

    #[test]
    fn test_product_form_prefills_from_entity() {
        let product: Product = serde_json::from_str(
            r#"{"id": 1, "name": "Bolt", "sku": "B-1", "price": "2.5", "supplier_id": 3}"#,
        )
        .unwrap();
        let form = ProductForm::from(&product);
        assert_eq!(form.price, "2.50");
        assert_eq!(form.supplier_id, "3");
        assert_eq!(form.reorder_level, "");
    }

    #[test]
    fn test_warehouse_capacity_must_be_positive() {
        let form = WarehouseForm {
            name: "North".into(),
            capacity: "0".into(),
            ..WarehouseForm::default()
        };
        assert!(validate_warehouse(&form).unwrap_err().has("capacity"));

        let form = WarehouseForm {
            capacity: String::new(),
            ..form
        };
        assert_eq!(validate_warehouse(&form).unwrap().capacity, None);
    }

    #[test]
    fn test_supplier_email_is_optional_but_checked() {
        let mut form = SupplierForm {
            name: "Acme".into(),
            ..SupplierForm::default()
        };
        assert_eq!(validate_supplier(&form).unwrap().email, None);

        form.email = "sales@acme".into();
        assert_eq!(
            validate_supplier(&form).unwrap_err().first("email"),
            Some("Enter a valid email address")
        );
    }
}
