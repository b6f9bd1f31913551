//! Core domain logic for stockcart.
//! This crate is the single source of truth for catalog and cart invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod search;
pub mod service;
pub mod store;

pub use config::StorePaths;
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::catalog_defaults::default_products;
pub use model::product::{
    parse_price, price_from_f64, Product, ProductDraft, ProductKey, ProductValidationError,
};
pub use search::filter::{search_products, SearchMode, UnknownSearchMode};
pub use service::inventory_service::{
    CartLine, InventoryError, InventoryResult, InventoryService,
};
pub use store::backup::{list_backups, read_backup, write_backup};
pub use store::cart_store::CartStore;
pub use store::catalog_store::CatalogStore;
pub use store::document::{Document, FileDocument};
#[cfg(any(test, feature = "test-util"))]
pub use store::document::MemoryDocument;
pub use store::{Loaded, PersistResult, PersistenceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
