//! Core use-case services.
//!
//! # Responsibility
//! - Expose the inventory call boundary used by interaction layers.
//! - Keep cross-store invariants (cascade delete, cached total) in one
//!   place so callers cannot forget them.

pub mod inventory_service;
