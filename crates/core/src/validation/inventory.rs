use serde::Deserialize;

use super::{ValidationErrors, optional_text, parse_integer, required_id};
use crate::models::{NewStockTransfer, StockAdjustment};
use crate::stock::StockIndex;
use crate::types::{ProductId, WarehouseId};

/// Manual stock correction form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdjustmentForm {
    pub product_id: String,
    pub warehouse_id: String,
    pub delta: String,
    pub reason: String,
}

/// Validate a stock adjustment against the quantity currently on hand.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_adjustment(
    form: &AdjustmentForm,
    stock: &StockIndex,
) -> Result<StockAdjustment, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let product_id: Option<ProductId> =
        required_id(&mut errors, "product_id", "product", &form.product_id);
    let warehouse_id: Option<WarehouseId> =
        required_id(&mut errors, "warehouse_id", "warehouse", &form.warehouse_id);

    let delta = match parse_integer(&form.delta) {
        Some(0) => {
            errors.add("delta", "Adjustment cannot be zero");
            0
        }
        Some(delta) => delta,
        None => {
            errors.add("delta", "Adjustment must be a whole number");
            0
        }
    };

    if let (Some(product), Some(warehouse)) = (product_id, warehouse_id) {
        let on_hand = stock.quantity(product, warehouse);
        match on_hand.checked_add(delta) {
            None => errors.add("delta", "Adjustment is too large"),
            Some(after) if after < 0 => errors.add(
                "delta",
                format!(
                    "Only {on_hand} on hand; cannot remove {}",
                    delta.unsigned_abs()
                ),
            ),
            Some(_) => {}
        }
    }

    match (product_id, warehouse_id) {
        (Some(product_id), Some(warehouse_id)) if errors.is_empty() => Ok(StockAdjustment {
            product_id,
            warehouse_id,
            delta,
            reason: optional_text(&form.reason),
        }),
        _ => Err(errors),
    }
}

/// Stock transfer request form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TransferForm {
    pub product_id: String,
    pub from_warehouse_id: String,
    pub to_warehouse_id: String,
    pub quantity: String,
    pub note: String,
}

/// Validate a transfer against the stock held at the source warehouse.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_transfer(
    form: &TransferForm,
    stock: &StockIndex,
) -> Result<NewStockTransfer, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let product_id: Option<ProductId> =
        required_id(&mut errors, "product_id", "product", &form.product_id);
    let from: Option<WarehouseId> = required_id(
        &mut errors,
        "from_warehouse_id",
        "source warehouse",
        &form.from_warehouse_id,
    );
    let to: Option<WarehouseId> = required_id(
        &mut errors,
        "to_warehouse_id",
        "destination warehouse",
        &form.to_warehouse_id,
    );

    if from.is_some() && from == to {
        errors.add(
            "to_warehouse_id",
            "Destination must differ from the source warehouse",
        );
    }

    let quantity = match parse_integer(&form.quantity) {
        Some(qty) if qty > 0 => qty,
        _ => {
            errors.add("quantity", "Quantity must be a whole number above zero");
            0
        }
    };

    if let (Some(product), Some(source)) = (product_id, from) {
        let available = stock.quantity(product, source);
        if quantity > available {
            errors.add(
                "quantity",
                format!("Only {available} available at the source warehouse"),
            );
        }
    }

    match (product_id, from, to) {
        (Some(product_id), Some(from_warehouse_id), Some(to_warehouse_id))
            if errors.is_empty() =>
        {
            Ok(NewStockTransfer {
                product_id,
                from_warehouse_id,
                to_warehouse_id,
                quantity,
                note: optional_text(&form.note),
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::ProductDetail;

    fn stock() -> StockIndex {
        let rows: Vec<ProductDetail> = serde_json::from_str(
            r#"[{"pid": 1, "wid": 1, "qty": 5}, {"pid": 1, "wid": 2, "qty": 0}]"#,
        )
        .unwrap();
        StockIndex::from_rows(&rows)
    }

    fn adjustment(delta: &str) -> AdjustmentForm {
        AdjustmentForm {
            product_id: "1".into(),
            warehouse_id: "1".into(),
            delta: delta.into(),
            reason: "cycle count".into(),
        }
    }

    fn transfer(from: &str, to: &str, quantity: &str) -> TransferForm {
        TransferForm {
            product_id: "1".into(),
            from_warehouse_id: from.into(),
            to_warehouse_id: to.into(),
            quantity: quantity.into(),
            note: String::new(),
        }
    }

    #[test]
    fn test_adjustment_accepts_removals_within_stock() {
        let adj = validate_adjustment(&adjustment("-5"), &stock()).unwrap();
        assert_eq!(adj.delta, -5);
        assert_eq!(adj.reason.as_deref(), Some("cycle count"));
    }

    #[test]
    fn test_adjustment_cannot_drive_stock_negative() {
        let errors = validate_adjustment(&adjustment("-6"), &stock()).unwrap_err();
        assert_eq!(errors.first("delta"), Some("Only 5 on hand; cannot remove 6"));
    }

    #[test]
    fn test_adjustment_extremes_are_field_errors() {
        let errors =
            validate_adjustment(&adjustment("9223372036854775807"), &stock()).unwrap_err();
        assert_eq!(errors.first("delta"), Some("Adjustment is too large"));

        let errors =
            validate_adjustment(&adjustment("-9223372036854775808"), &stock()).unwrap_err();
        assert_eq!(
            errors.first("delta"),
            Some("Only 5 on hand; cannot remove 9223372036854775808")
        );
    }

    #[test]
    fn test_adjustment_rejects_zero_and_text() {
        assert_eq!(
            validate_adjustment(&adjustment("0"), &stock())
                .unwrap_err()
                .first("delta"),
            Some("Adjustment cannot be zero")
        );
        assert!(
            validate_adjustment(&adjustment("lots"), &stock())
                .unwrap_err()
                .has("delta")
        );
    }

    #[test]
    fn test_transfer_within_available_stock() {
        let new = validate_transfer(&transfer("1", "2", "5"), &stock()).unwrap();
        assert_eq!(new.from_warehouse_id, WarehouseId::new(1));
        assert_eq!(new.to_warehouse_id, WarehouseId::new(2));
        assert_eq!(new.note, None);
    }

    #[test]
    fn test_transfer_rejects_same_warehouse() {
        let errors = validate_transfer(&transfer("1", "1", "1"), &stock()).unwrap_err();
        assert_eq!(
            errors.first("to_warehouse_id"),
            Some("Destination must differ from the source warehouse")
        );
    }

    #[test]
    fn test_transfer_rejects_more_than_available() {
        let errors = validate_transfer(&transfer("2", "1", "1"), &stock()).unwrap_err();
        assert_eq!(
            errors.first("quantity"),
            Some("Only 0 available at the source warehouse")
        );
    }

    #[test]
    fn test_transfer_rejects_non_positive_quantity() {
        let errors = validate_transfer(&transfer("1", "2", "0"), &stock()).unwrap_err();
        assert_eq!(
            errors.first("quantity"),
            Some("Quantity must be a whole number above zero")
        );
    }
}
