//! Data table component types.
//!
//! List pages describe their columns and select filters once; the shared
//! `_table_head.html` / `_filters.html` partials render from that definition.

use depot_core::models::Warehouse;
use depot_core::{OrderStatus, OrderType, TransferStatus};

/// Column definition for a data table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Right-align (numbers, money).
    pub numeric: bool,
}

impl TableColumn {
    /// Create a text column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            numeric: false,
        }
    }

    /// Create a right-aligned numeric column.
    #[must_use]
    pub fn numeric(key: &str, label: &str) -> Self {
        Self {
            numeric: true,
            ..Self::new(key, label)
        }
    }

    /// CSS class for header and cells.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        if self.numeric { "num" } else { "" }
    }
}

/// Option for select filters.
#[derive(Debug, Clone)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Select filter definition for a data table.
///
/// The first rendered option is always "All" (empty value).
#[derive(Debug, Clone)]
pub struct TableFilter {
    /// Query parameter key.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Available options.
    pub options: Vec<FilterOption>,
    /// Currently selected value (empty for "All").
    pub selected: String,
}

impl TableFilter {
    /// Create a select filter.
    #[must_use]
    pub fn select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            options,
            selected: String::new(),
        }
    }

    /// Whether `value` is the selected option.
    #[must_use]
    pub fn is_selected(&self, value: &str) -> bool {
        self.selected == value
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Filter definitions.
    pub filters: Vec<TableFilter>,
    /// Search placeholder text; `None` hides the search box.
    pub search_placeholder: Option<String>,
    /// Current search text.
    pub search: String,
    /// Title for empty state.
    pub empty_title: String,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            filters: vec![],
            search_placeholder: None,
            search: String::new(),
            empty_title: "No items found".to_string(),
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Show a search box.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = Some(placeholder.to_string());
        self
    }

    /// Set the empty state title.
    #[must_use]
    pub fn empty_state(mut self, title: &str) -> Self {
        self.empty_title = title.to_string();
        self
    }

    /// Mark the current value of filter `key`. Unknown keys are ignored.
    #[must_use]
    pub fn selected(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(filter) = self.filters.iter_mut().find(|f| f.key == key) {
            filter.selected = value.unwrap_or_default().to_string();
        }
        self
    }

    /// Fill the search box.
    #[must_use]
    pub fn searched(mut self, search: Option<&str>) -> Self {
        self.search = search.unwrap_or_default().to_string();
        self
    }

    /// Whether any filter or the search is active.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        !self.search.is_empty() || self.filters.iter().any(|f| !f.selected.is_empty())
    }
}

fn warehouse_options(warehouses: &[Warehouse]) -> Vec<FilterOption> {
    warehouses
        .iter()
        .map(|w| FilterOption::new(&w.id.to_string(), &w.name))
        .collect()
}

/// Build the orders table configuration.
#[must_use]
pub fn orders_table_config(warehouses: &[Warehouse]) -> DataTableConfig {
    DataTableConfig::new("orders")
        .column(TableColumn::new("id", "Order"))
        .column(TableColumn::new("type", "Type"))
        .column(TableColumn::new("status", "Status"))
        .column(TableColumn::new("warehouse", "Warehouse"))
        .column(TableColumn::new("party", "Customer / Supplier"))
        .column(TableColumn::numeric("total", "Total"))
        .column(TableColumn::new("created", "Created"))
        .filter(TableFilter::select(
            "order_type",
            "Type",
            OrderType::ALL
                .iter()
                .map(|t| FilterOption::new(t.as_str(), t.label()))
                .collect(),
        ))
        .filter(TableFilter::select(
            "status",
            "Status",
            OrderStatus::ALL
                .iter()
                .map(|s| FilterOption::new(s.as_str(), s.label()))
                .collect(),
        ))
        .filter(TableFilter::select(
            "warehouse_id",
            "Warehouse",
            warehouse_options(warehouses),
        ))
        .search_placeholder("Search by order number or customer...")
        .empty_state("No orders found")
}

/// Build the stock matrix configuration.
#[must_use]
pub fn inventory_table_config(warehouses: &[Warehouse]) -> DataTableConfig {
    DataTableConfig::new("inventory")
        .column(TableColumn::new("product", "Product"))
        .column(TableColumn::new("sku", "SKU"))
        .column(TableColumn::new("warehouse", "Warehouse"))
        .column(TableColumn::numeric("quantity", "On hand"))
        .column(TableColumn::numeric("threshold", "Reorder at"))
        .filter(TableFilter::select(
            "warehouse_id",
            "Warehouse",
            warehouse_options(warehouses),
        ))
        .search_placeholder("Search by product name or SKU...")
        .empty_state("No stock recorded")
}

/// Build the stock transfers table configuration.
#[must_use]
pub fn transfers_table_config() -> DataTableConfig {
    DataTableConfig::new("transfers")
        .column(TableColumn::new("id", "Transfer"))
        .column(TableColumn::new("product", "Product"))
        .column(TableColumn::new("from", "From"))
        .column(TableColumn::new("to", "To"))
        .column(TableColumn::numeric("quantity", "Quantity"))
        .column(TableColumn::new("status", "Status"))
        .column(TableColumn::new("created", "Requested"))
        .column(TableColumn::new("actions", ""))
        .filter(TableFilter::select(
            "status",
            "Status",
            TransferStatus::ALL
                .iter()
                .map(|s| FilterOption::new(s.as_str(), s.label()))
                .collect(),
        ))
        .empty_state("No stock transfers yet")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_config_lists_every_type_and_status() {
        let config = orders_table_config(&[]);
        let types = &config.filters[0];
        assert_eq!(types.key, "order_type");
        assert_eq!(types.options.len(), OrderType::ALL.len());
        assert_eq!(config.filters[1].options.len(), OrderStatus::ALL.len());
        assert!(config.filters[2].options.is_empty());
    }

    #[test]
    fn test_selection_marks_filter_and_search() {
        let config = transfers_table_config();
        assert!(!config.is_filtered());

        let config = config.selected("status", Some("pending")).searched(None);
        assert!(config.filters[0].is_selected("pending"));
        assert!(!config.filters[0].is_selected(""));
        assert!(config.is_filtered());

        let config = config.selected("missing", Some("x"));
        assert_eq!(config.filters.len(), 1);
    }

    #[test]
    fn test_numeric_columns_align_right() {
        let config = inventory_table_config(&[]);
        let quantity = config.columns.iter().find(|c| c.key == "quantity").unwrap();
        assert_eq!(quantity.css_class(), "num");
        assert_eq!(config.columns[0].css_class(), "");
    }
}
