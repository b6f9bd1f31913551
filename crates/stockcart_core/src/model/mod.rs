//! Inventory domain model.
//!
//! # Responsibility
//! - Define the product record and its composite identity.
//! - Own operator-input validation and the built-in default catalog.
//!
//! # Invariants
//! - Identity is structured (`ProductKey`), never re-derived by splitting
//!   strings inside the core.
//! - The catalog does not enforce key uniqueness.

pub mod catalog_defaults;
pub mod product;
