//! Inventory use-case service.
//!
//! # Responsibility
//! - Own the catalog and cart stores explicitly (no ambient session state).
//! - Provide the operations an interaction layer calls: list, search, add,
//!   delete, adjust, clear, total, backup, restore.
//!
//! # Invariants
//! - Every mutation is written through before returning.
//! - Deleting a product also removes its cart entry.
//! - `cart_total()` always equals `compute_total()` after any call returns,
//!   including calls that failed to persist.
//! - Validation failures leave both stores untouched.

use crate::config::StorePaths;
use crate::model::product::{Product, ProductDraft, ProductKey, ProductValidationError};
use crate::search::filter::{search_products, SearchMode};
use crate::store::backup::{read_backup, write_backup};
use crate::store::cart_store::{line_amount, CartStore};
use crate::store::catalog_store::CatalogStore;
use crate::store::document::{Document, FileDocument};
use crate::store::{Loaded, PersistenceError};
use chrono::Local;
use log::{info, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Service-level error for inventory use-cases.
#[derive(Debug)]
pub enum InventoryError {
    /// Input rejected before any mutation.
    Validation(ProductValidationError),
    /// Document read/write failed. In-memory state reflects the attempted
    /// mutation.
    Persistence(PersistenceError),
}

impl Display for InventoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for InventoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<ProductValidationError> for InventoryError {
    fn from(value: ProductValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistenceError> for InventoryError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// One order-summary row: a cart entry with a positive quantity and a
/// matching catalog record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub key: ProductKey,
    pub product_name: String,
    pub barcode: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Catalog + cart facade.
pub struct InventoryService<D: Document> {
    catalog: CatalogStore<D>,
    cart: CartStore<D>,
    cart_total: Decimal,
}

impl InventoryService<FileDocument> {
    /// Opens both documents from disk.
    pub fn open(paths: &StorePaths) -> Loaded<Self> {
        Self::from_documents(
            FileDocument::new(paths.catalog.as_path()),
            FileDocument::new(paths.cart.as_path()),
        )
    }
}

impl<D: Document> InventoryService<D> {
    /// Loads the catalog (self-healing to defaults) and then the cart, with
    /// cart keys resolved against the loaded catalog.
    pub fn from_documents(catalog_document: D, cart_document: D) -> Loaded<Self> {
        let Loaded {
            store: catalog,
            mut notices,
        } = CatalogStore::load(catalog_document);
        let Loaded {
            store: cart,
            notices: cart_notices,
        } = CartStore::load(cart_document, |rendered| catalog.resolve_key(rendered));
        notices.extend(cart_notices);

        let mut service = Self {
            catalog,
            cart,
            cart_total: Decimal::ZERO,
        };
        service.refresh_total();
        info!(
            "event=inventory_open module=service status=ok products={} cart_entries={} notices={}",
            service.catalog.len(),
            service.cart.entries().len(),
            notices.len()
        );

        Loaded {
            store: service,
            notices,
        }
    }

    /// Current catalog in display order.
    pub fn products(&self) -> &[Product] {
        self.catalog.products()
    }

    pub fn product_count(&self) -> usize {
        self.catalog.len()
    }

    /// First catalog record carrying `key`.
    pub fn find_product(&self, key: &ProductKey) -> Option<&Product> {
        self.catalog.find(key)
    }

    /// Maps a rendered `part_name` key to a structured key.
    pub fn resolve_key(&self, rendered: &str) -> ProductKey {
        self.catalog.resolve_key(rendered)
    }

    /// Replaces the whole catalog and persists it.
    pub fn save_catalog(&mut self, products: Vec<Product>) -> InventoryResult<()> {
        let saved = self.catalog.replace_all(products);
        self.refresh_total();
        Ok(saved?)
    }

    /// Validates and appends a new product.
    ///
    /// # Errors
    /// - `Validation` when the name is blank or the price is not positive;
    ///   nothing changes.
    /// - `Persistence` when the catalog write fails; the product stays in
    ///   memory.
    pub fn add_product(&mut self, draft: ProductDraft) -> InventoryResult<ProductKey> {
        let product = match draft.into_product() {
            Ok(product) => product,
            Err(err) => {
                warn!("event=product_add module=service status=rejected reason={err}");
                return Err(err.into());
            }
        };

        let key = product.key();
        let saved = self.catalog.append(product);
        self.refresh_total();
        saved?;
        info!(
            "event=product_add module=service status=ok count={}",
            self.catalog.len()
        );
        Ok(key)
    }

    /// Removes every product with `key` and its cart entry.
    ///
    /// Returns the number of catalog records removed. The cart entry is
    /// dropped even when no catalog record matched. Both writes are
    /// attempted; the first failure is returned.
    pub fn delete_product(&mut self, key: &ProductKey) -> InventoryResult<usize> {
        let catalog_outcome = self.catalog.remove_key(key);
        let cart_outcome = self.cart.remove(key);
        self.refresh_total();

        let removed = catalog_outcome?;
        let cart_removed = cart_outcome?;
        info!(
            "event=product_delete module=service status=ok removed={removed} cart_entry_removed={cart_removed}"
        );
        Ok(removed)
    }

    /// Pure catalog search; see `search_products`.
    pub fn search(&self, query: &str, mode: SearchMode) -> Vec<Product> {
        search_products(self.catalog.products(), query, mode)
    }

    /// Snapshot of all cart entries, including zero quantities.
    pub fn cart_quantities(&self) -> BTreeMap<ProductKey, u32> {
        self.cart.entries().clone()
    }

    /// Quantity for a key; zero when never added.
    pub fn quantity(&self, key: &ProductKey) -> u32 {
        self.cart.quantity(key)
    }

    /// Whether any entry has a positive quantity.
    pub fn has_items(&self) -> bool {
        self.cart.total_units() > 0
    }

    /// Adds `delta` (may be negative) to a key's quantity, flooring at zero.
    pub fn adjust_quantity(&mut self, key: &ProductKey, delta: i64) -> InventoryResult<u32> {
        let outcome = self.cart.adjust(key, delta);
        self.refresh_total();
        Ok(outcome?)
    }

    /// Rewrites the cart document from memory.
    pub fn save_cart(&self) -> InventoryResult<()> {
        Ok(self.cart.save()?)
    }

    /// Empties the cart.
    pub fn clear_cart(&mut self) -> InventoryResult<()> {
        let outcome = self.cart.clear();
        self.refresh_total();
        info!("event=cart_clear module=service status={}", status(&outcome));
        Ok(outcome?)
    }

    /// Recomputes the cart total from the current catalog.
    pub fn compute_total(&self) -> Decimal {
        self.cart.compute_total(self.catalog.products())
    }

    /// Total cached after the last mutation.
    pub fn cart_total(&self) -> Decimal {
        self.cart_total
    }

    /// Order-summary rows in cart order.
    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.cart
            .entries()
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .filter_map(|(key, qty)| {
                let product = self.catalog.find(key)?;
                Some(CartLine {
                    key: key.clone(),
                    product_name: product.product_name.clone(),
                    barcode: product.barcode.clone(),
                    quantity: *qty,
                    unit_price: product.price,
                    subtotal: line_amount(product.price, *qty),
                })
            })
            .collect()
    }

    /// Subtotal for one catalog row, when its key has a positive quantity.
    pub fn line_subtotal(&self, product: &Product) -> Option<Decimal> {
        let qty = self.cart.quantity(&product.key());
        (qty > 0).then(|| line_amount(product.price, qty))
    }

    /// Replaces the catalog with the built-in defaults.
    pub fn restore_defaults(&mut self) -> InventoryResult<()> {
        let outcome = self.catalog.restore_defaults();
        self.refresh_total();
        info!(
            "event=catalog_restore module=service status={} source=defaults",
            status(&outcome)
        );
        Ok(outcome?)
    }

    /// Writes a timestamped copy of the catalog into `dir`.
    ///
    /// Neither the primary document nor memory is touched.
    pub fn backup(&self, dir: &Path) -> InventoryResult<PathBuf> {
        let taken_at = Local::now().naive_local();
        Ok(write_backup(dir, self.catalog.products(), taken_at)?)
    }

    /// Replaces the catalog with the content of a backup file.
    ///
    /// Nothing changes when the backup cannot be read.
    pub fn restore_backup(&mut self, path: &Path) -> InventoryResult<usize> {
        let products = read_backup(path)?;
        let count = products.len();
        let outcome = self.catalog.replace_all(products);
        self.refresh_total();
        info!(
            "event=catalog_restore module=service status={} source=backup count={count}",
            status(&outcome)
        );
        outcome?;
        Ok(count)
    }

    fn refresh_total(&mut self) {
        self.cart_total = self.compute_total();
    }
}

fn status<T, E>(outcome: &Result<T, E>) -> &'static str {
    if outcome.is_ok() {
        "ok"
    } else {
        "error"
    }
}
