//! Depot Core - shared inventory types.
//!
//! Used by both Depot components:
//! - `admin` - server-rendered inventory dashboard
//! - `cli` - `depot` command-line tool for scripting stock operations
//!
//! # Architecture
//!
//! The core crate holds plain data and pure functions only. It performs no
//! I/O and knows nothing about HTTP, so everything here is testable in
//! isolation.
//!
//! # Modules
//!
//! - [`types`] - typed IDs, emails, money helpers and status enums
//! - [`models`] - backend entity DTOs and request payloads
//! - [`validation`] - form parsing and client-side checks
//! - [`pagination`] - in-memory paging of list views
//! - [`stock`] - stock lookups, compatible warehouses and low-stock rows

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod pagination;
pub mod stock;
pub mod types;
pub mod validation;

pub use types::*;
