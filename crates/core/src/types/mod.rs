//! Core value types for Depot.
//!
//! Type-safe IDs, validated emails, money helpers and entity status enums.

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{MoneyError, format_money, line_total, order_total, parse_money};
pub use status::*;
