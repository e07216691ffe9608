use std::collections::HashMap;

use super::{ValidationErrors, optional_id, optional_text, parse_integer, required_id};
use crate::models::{NewOrder, NewOrderLine, Product};
use crate::stock::{StockIndex, requested_totals};
use crate::types::{
    MoneyError, OrderType, ProductId, SupplierId, WarehouseId, id::parse_id, line_total,
    order_total, parse_money,
};

/// One product line as typed into the order form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderLineForm {
    pub product_id: String,
    pub quantity: String,
    /// Blank means "use the product's list price".
    pub unit_price: String,
}

impl OrderLineForm {
    fn is_blank(&self) -> bool {
        self.product_id.trim().is_empty()
            && self.quantity.trim().is_empty()
            && self.unit_price.trim().is_empty()
    }

    /// Selected product, if the field holds a valid ID.
    #[must_use]
    pub fn product(&self) -> Option<ProductId> {
        parse_id(&self.product_id).ok().map(ProductId::new)
    }

    /// Requested quantity, zero when not a number.
    #[must_use]
    pub fn quantity_value(&self) -> i64 {
        parse_integer(&self.quantity).unwrap_or(0)
    }
}

/// The order form, header plus any number of lines.
///
/// HTML posts the line fields as repeated keys (`product_id`, `quantity`,
/// `unit_price`), so the form is built from raw key/value pairs rather than
/// a derived `Deserialize`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub order_type: String,
    pub warehouse_id: String,
    pub supplier_id: String,
    pub customer_name: String,
    pub note: String,
    pub lines: Vec<OrderLineForm>,
}

impl OrderForm {
    /// Build the form from urlencoded pairs.
    ///
    /// Line fields are matched up by position. `add_line` appends an empty
    /// line and `remove_line=N` drops line `N` (0-based), which lets the
    /// form grow and shrink without JavaScript.
    #[must_use]
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut form = Self::default();
        let mut columns: HashMap<&str, Vec<String>> = HashMap::new();
        let mut add_line = false;
        let mut remove_line = None;

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "order_type" => form.order_type = value.to_owned(),
                "warehouse_id" => form.warehouse_id = value.to_owned(),
                "supplier_id" => form.supplier_id = value.to_owned(),
                "customer_name" => form.customer_name = value.to_owned(),
                "note" => form.note = value.to_owned(),
                "add_line" => add_line = true,
                "remove_line" => remove_line = value.trim().parse::<usize>().ok(),
                key @ ("product_id" | "quantity" | "unit_price") => columns
                    .entry(key)
                    .or_default()
                    .push(value.to_owned()),
                _ => {}
            }
        }

        let mut take = |key: &str| columns.remove(key).unwrap_or_default();
        let products = take("product_id");
        let quantities = take("quantity");
        let prices = take("unit_price");
        let count = products.len().max(quantities.len()).max(prices.len());
        let cell = |column: &[String], i: usize| column.get(i).cloned().unwrap_or_default();

        form.lines = (0..count)
            .map(|i| OrderLineForm {
                product_id: cell(&products, i),
                quantity: cell(&quantities, i),
                unit_price: cell(&prices, i),
            })
            .collect();

        if let Some(index) = remove_line
            && index < form.lines.len()
        {
            form.lines.remove(index);
        }
        if add_line {
            form.lines.push(OrderLineForm::default());
        }
        form
    }

    /// Parsed order type, falling back to a sale.
    #[must_use]
    pub fn order_type_value(&self) -> OrderType {
        self.order_type.parse().unwrap_or_default()
    }

    /// Selected warehouse, if any.
    #[must_use]
    pub fn warehouse(&self) -> Option<WarehouseId> {
        parse_id(&self.warehouse_id).ok().map(WarehouseId::new)
    }

    /// `(product, quantity)` per line for stock lookups.
    #[must_use]
    pub fn requested(&self) -> Vec<(Option<ProductId>, i64)> {
        self.lines
            .iter()
            .map(|line| (line.product(), line.quantity_value()))
            .collect()
    }

    /// Lines with at least one field filled in.
    fn filled_lines(&self) -> impl Iterator<Item = (usize, &OrderLineForm)> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !line.is_blank())
            .map(|(i, line)| (i + 1, line))
    }
}

/// A fully checked order ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
    pub order: NewOrder,
    pub lines: Vec<NewOrderLine>,
}

/// Validate the order form against the catalog and current stock.
///
/// Fully blank lines are ignored. A blank unit price uses the product's
/// list price. Line problems are reported under the `lines` field.
///
/// # Errors
///
/// Returns every failing field.
pub fn validate_order(
    form: &OrderForm,
    products: &[Product],
    stock: &StockIndex,
) -> Result<ValidatedOrder, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let order_type = match form.order_type.trim() {
        "" => {
            errors.add("order_type", "Select an order type");
            OrderType::default()
        }
        raw => raw.parse::<OrderType>().unwrap_or_else(|_| {
            errors.add("order_type", "Select a valid order type");
            OrderType::default()
        }),
    };

    let warehouse_id: Option<WarehouseId> =
        required_id(&mut errors, "warehouse_id", "warehouse", &form.warehouse_id);

    let supplier_id: Option<SupplierId> = if order_type.requires_supplier() {
        required_id(&mut errors, "supplier_id", "supplier", &form.supplier_id)
    } else {
        optional_id(&mut errors, "supplier_id", "supplier", &form.supplier_id)
    };

    let mut lines = Vec::new();
    for (number, line) in form.filled_lines() {
        let product = match line.product() {
            Some(id) => products.iter().find(|p| p.id == id),
            None => None,
        };
        let Some(product) = product else {
            errors.add("lines", format!("Line {number}: select a product"));
            continue;
        };

        let quantity = match parse_integer(&line.quantity) {
            Some(qty) if qty > 0 => qty,
            _ => {
                errors.add(
                    "lines",
                    format!("Line {number}: quantity must be a whole number above zero"),
                );
                continue;
            }
        };

        let unit_price = match parse_money(&line.unit_price) {
            Ok(price) if price.is_sign_negative() && !price.is_zero() => {
                errors.add("lines", format!("Line {number}: unit price cannot be negative"));
                continue;
            }
            Ok(price) => price,
            Err(MoneyError::Empty) => product.price,
            Err(MoneyError::Invalid(_)) => {
                errors.add("lines", format!("Line {number}: unit price must be a number"));
                continue;
            }
        };

        if line_total(quantity, unit_price).is_none() {
            errors.add("lines", format!("Line {number}: total is too large"));
            continue;
        }

        lines.push(NewOrderLine {
            product_id: product.id,
            quantity,
            unit_price,
        });
    }

    if form.filled_lines().next().is_none() {
        errors.add("lines", "Add at least one product line");
    }

    if order_type.requires_stock()
        && let Some(warehouse) = warehouse_id
    {
        let requested = requested_totals(lines.iter().map(|l| (Some(l.product_id), l.quantity)));
        for (product_id, wanted) in requested {
            let available = stock.quantity(product_id, warehouse);
            if wanted > available {
                let name = products
                    .iter()
                    .find(|p| p.id == product_id)
                    .map_or_else(|| product_id.to_string(), Product::label);
                errors.add(
                    "lines",
                    format!(
                        "Not enough {name} in the selected warehouse: {wanted} requested, {available} available"
                    ),
                );
            }
        }
    }

    let total = order_total(lines.iter().map(|l| (l.quantity, l.unit_price)));
    if total.is_none() {
        errors.add("lines", "Order total is too large");
    }

    match (warehouse_id, total) {
        (Some(warehouse_id), Some(total)) if errors.is_empty() => Ok(ValidatedOrder {
            order: NewOrder {
                order_type,
                warehouse_id,
                supplier_id,
                customer_name: optional_text(&form.customer_name),
                note: optional_text(&form.note),
                total,
            },
            lines,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::ProductDetail;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn products() -> Vec<Product> {
        serde_json::from_str(
            r#"[
                {"id": 1, "name": "Bolt", "sku": "B-1", "price": "0.50"},
                {"id": 2, "name": "Nut", "sku": "N-1", "price": "0.20"}
            ]"#,
        )
        .unwrap()
    }

    fn stock() -> StockIndex {
        let rows: Vec<ProductDetail> = serde_json::from_str(
            r#"[
                {"product_id": 1, "warehouse_id": 1, "quantity": 10},
                {"product_id": 2, "warehouse_id": 1, "quantity": 3}
            ]"#,
        )
        .unwrap();
        StockIndex::from_rows(&rows)
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_groups_repeated_keys_into_lines() {
        let form = OrderForm::from_pairs(&pairs(&[
            ("order_type", "sale"),
            ("warehouse_id", "1"),
            ("product_id", "1"),
            ("quantity", "2"),
            ("unit_price", ""),
            ("product_id", "2"),
            ("quantity", "3"),
            ("unit_price", "0.25"),
        ]));
        assert_eq!(form.lines.len(), 2);
        assert_eq!(form.lines[1].unit_price, "0.25");
        assert_eq!(
            form.requested(),
            vec![(Some(ProductId::new(1)), 2), (Some(ProductId::new(2)), 3)]
        );
    }

    #[test]
    fn test_add_and_remove_line() {
        let form = OrderForm::from_pairs(&pairs(&[
            ("product_id", "1"),
            ("quantity", "1"),
            ("product_id", "2"),
            ("quantity", "1"),
            ("remove_line", "0"),
            ("add_line", "1"),
        ]));
        assert_eq!(form.lines.len(), 2);
        assert_eq!(form.lines[0].product_id, "2");
        assert_eq!(form.lines[1], OrderLineForm::default());
    }

    #[test]
    fn test_sale_fills_blank_prices_and_totals() {
        let form = OrderForm::from_pairs(&pairs(&[
            ("order_type", "SALE"),
            ("warehouse_id", "1"),
            ("customer_name", " Dana "),
            ("product_id", "1"),
            ("quantity", "4"),
            ("unit_price", ""),
            ("product_id", "2"),
            ("quantity", "2"),
            ("unit_price", "0.25"),
            ("product_id", ""),
            ("quantity", ""),
            ("unit_price", ""),
        ]));
        let order = validate_order(&form, &products(), &stock()).unwrap();
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].unit_price, Decimal::from_str("0.50").unwrap());
        assert_eq!(order.order.total, Decimal::from_str("2.50").unwrap());
        assert_eq!(order.order.customer_name.as_deref(), Some("Dana"));
    }

    #[test]
    fn test_sale_cannot_exceed_stock_across_duplicate_lines() {
        let form = OrderForm::from_pairs(&pairs(&[
            ("order_type", "sale"),
            ("warehouse_id", "1"),
            ("product_id", "2"),
            ("quantity", "2"),
            ("product_id", "2"),
            ("quantity", "2"),
        ]));
        let errors = validate_order(&form, &products(), &stock()).unwrap_err();
        assert_eq!(
            errors.first("lines"),
            Some("Not enough Nut (N-1) in the selected warehouse: 4 requested, 3 available")
        );
    }

    #[test]
    fn test_import_needs_supplier_but_not_stock() {
        let form = OrderForm::from_pairs(&pairs(&[
            ("order_type", "import"),
            ("warehouse_id", "2"),
            ("product_id", "1"),
            ("quantity", "500"),
        ]));
        let errors = validate_order(&form, &products(), &stock()).unwrap_err();
        assert_eq!(errors.first("supplier_id"), Some("Select a supplier"));
        assert!(!errors.has("lines"));

        let mut form = form;
        form.supplier_id = "7".into();
        let order = validate_order(&form, &products(), &stock()).unwrap();
        assert_eq!(order.order.supplier_id, Some(SupplierId::new(7)));
    }

    #[test]
    fn test_rejects_empty_and_bad_lines() {
        let form = OrderForm::from_pairs(&pairs(&[("order_type", "export")]));
        let errors = validate_order(&form, &products(), &stock()).unwrap_err();
        assert_eq!(errors.first("warehouse_id"), Some("Select a warehouse"));
        assert_eq!(errors.first("lines"), Some("Add at least one product line"));

        let form = OrderForm::from_pairs(&pairs(&[
            ("order_type", "export"),
            ("warehouse_id", "1"),
            ("product_id", "1"),
            ("quantity", "-1"),
            ("unit_price", ""),
            ("product_id", ""),
            ("quantity", "3"),
            ("unit_price", ""),
            ("product_id", "2"),
            ("quantity", "1"),
            ("unit_price", "-0.10"),
        ]));
        let messages = validate_order(&form, &products(), &stock())
            .unwrap_err()
            .all("lines")
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            vec![
                "Line 1: quantity must be a whole number above zero",
                "Line 2: select a product",
                "Line 3: unit price cannot be negative",
            ]
        );
    }

    #[test]
    fn test_oversized_totals_are_line_errors() {
        let form = OrderForm::from_pairs(&pairs(&[
            ("order_type", "import"),
            ("warehouse_id", "1"),
            ("supplier_id", "1"),
            ("product_id", "1"),
            ("quantity", "9223372036854775807"),
            ("unit_price", "99999999999999999999"),
        ]));
        let errors = validate_order(&form, &products(), &stock()).unwrap_err();
        assert_eq!(errors.first("lines"), Some("Line 1: total is too large"));

        let max = Decimal::MAX.to_string();
        let form = OrderForm::from_pairs(&pairs(&[
            ("order_type", "import"),
            ("warehouse_id", "1"),
            ("supplier_id", "1"),
            ("product_id", "1"),
            ("quantity", "1"),
            ("unit_price", max.as_str()),
            ("product_id", "2"),
            ("quantity", "1"),
            ("unit_price", max.as_str()),
        ]));
        let errors = validate_order(&form, &products(), &stock()).unwrap_err();
        assert_eq!(errors.all("lines"), vec!["Order total is too large"]);
    }
}
