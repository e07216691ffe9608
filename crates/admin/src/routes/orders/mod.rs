//! Order pages: list, create (header + lines) and detail.

mod create;
mod detail;
mod list;

pub use create::{OrderFormTemplate, OrderLineView, create, new, refresh};
pub use detail::{OrderDetailLineView, OrderShowTemplate, delete, show};
pub use list::{OrderRowView, OrdersIndexTemplate, OrdersQuery, index};

use depot_core::{OrderStatus, OrderType};

/// Badge class for an order type.
pub(crate) const fn type_class(order_type: OrderType) -> &'static str {
    match order_type {
        OrderType::Sale => "badge-info",
        OrderType::Import => "badge-success",
        OrderType::Export => "badge-warning",
    }
}

/// Badge class for an order status.
pub(crate) const fn status_class(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "badge-warning",
        OrderStatus::Completed => "badge-success",
        OrderStatus::Cancelled => "badge-muted",
    }
}
