//! vellum-common: shared context types for the wiki core.
//!
//! This crate provides:
//! - `PageDirectory` / `VariableDirectory` - externally-owned, read-only
//!   lookup context supplied to every render call
//! - icon helpers for the `emoji||` hidden-mode convention
//! - `VellumError` - the shared error surface for store-backed operations

pub mod directory;
pub mod error;
pub mod icon;

pub use directory::{PageDirectory, PageSummary, PageType, Variable, VariableDirectory};
pub use error::VellumError;
pub use icon::{clean_icon, is_hidden_mode};
