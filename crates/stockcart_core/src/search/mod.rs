//! Catalog search.
//!
//! # Responsibility
//! - Filter the product sequence by substring, per selected field.
//!
//! # Invariants
//! - Search is pure: no persistence, no mutation.
//! - Results keep catalog order; there is no ranking.

pub mod filter;
