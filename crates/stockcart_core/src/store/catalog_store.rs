//! Catalog store: the ordered product sequence and its document.
//!
//! # Responsibility
//! - Load the catalog document, self-healing to the built-in defaults.
//! - Own append/remove/replace mutations over the ordered sequence.
//!
//! # Invariants
//! - Insertion order is display order; nothing here sorts.
//! - Composite keys are not unique; removal drops every matching record.
//! - A failed save leaves the in-memory sequence as mutated.

use super::document::{read_json, write_json, Document};
use super::{Loaded, PersistResult};
use crate::model::catalog_defaults::default_products;
use crate::model::product::{Product, ProductKey};
use log::{info, warn};

const LOAD_EVENT: &str = "catalog_load";
const SAVE_EVENT: &str = "catalog_save";

/// Ordered product catalog backed by one document.
#[derive(Debug)]
pub struct CatalogStore<D: Document> {
    document: D,
    products: Vec<Product>,
}

impl<D: Document> CatalogStore<D> {
    /// Loads the catalog document.
    ///
    /// When the document is absent, unreadable, or unparsable the built-in
    /// default list is used and written back immediately, so the next load
    /// reads it directly. Read and self-heal failures are returned as
    /// notices.
    pub fn load(document: D) -> Loaded<Self> {
        let mut notices = Vec::new();
        let loaded = match read_json::<Vec<Product>, _>(&document, LOAD_EVENT) {
            Ok(products) => products,
            Err(err) => {
                notices.push(err);
                None
            }
        };

        if let Some(products) = loaded {
            return Loaded {
                store: Self { document, products },
                notices,
            };
        }

        let store = Self {
            document,
            products: default_products(),
        };
        info!(
            "event=catalog_self_heal module=store status=start count={}",
            store.products.len()
        );
        if let Err(err) = store.save() {
            warn!("event=catalog_self_heal module=store status=error error_code={}", err.code());
            notices.push(err);
        }

        Loaded { store, notices }
    }

    /// Writes the full sequence, replacing the document.
    pub fn save(&self) -> PersistResult<()> {
        write_json(&self.document, &self.products, SAVE_EVENT)
    }

    /// Current records in display order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// First record carrying the given key.
    pub fn find(&self, key: &ProductKey) -> Option<&Product> {
        self.products.iter().find(|product| product.has_key(key))
    }

    /// Maps a rendered cart key back to a structured key.
    ///
    /// Exact matches against existing records win over separator parsing,
    /// which keeps part numbers containing `_` intact.
    pub fn resolve_key(&self, rendered: &str) -> ProductKey {
        self.products
            .iter()
            .map(Product::key)
            .find(|key| key.to_string() == rendered)
            .unwrap_or_else(|| ProductKey::parse(rendered))
    }

    /// Appends one record at the end and persists.
    ///
    /// The record is kept in memory even when the write fails.
    pub fn append(&mut self, product: Product) -> PersistResult<()> {
        self.products.push(product);
        self.save()
    }

    /// Removes every record matching the key and returns how many went.
    ///
    /// Persists only when something was removed. On write failure the
    /// removal still stands in memory.
    pub fn remove_key(&mut self, key: &ProductKey) -> PersistResult<usize> {
        let before = self.products.len();
        self.products.retain(|product| !product.has_key(key));
        let removed = before - self.products.len();
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    /// Replaces the whole sequence and persists.
    pub fn replace_all(&mut self, products: Vec<Product>) -> PersistResult<()> {
        self.products = products;
        self.save()
    }

    /// Discards the current sequence in favor of the built-in defaults.
    pub fn restore_defaults(&mut self) -> PersistResult<()> {
        self.replace_all(default_products())
    }
}

#[cfg(test)]
mod tests {
    use super::CatalogStore;
    use crate::model::catalog_defaults::default_products;
    use crate::model::product::{Product, ProductKey};
    use crate::store::document::MemoryDocument;
    use rust_decimal::Decimal;

    fn seeded(products: &[Product]) -> MemoryDocument {
        MemoryDocument::with_contents("catalog", serde_json::to_vec(products).unwrap())
    }

    #[test]
    fn resolve_key_prefers_exact_catalog_match() {
        let document = seeded(&[Product::new("AB_12", "Nozzle", Decimal::ONE)]);
        let store = CatalogStore::load(document).store;

        assert_eq!(
            store.resolve_key("AB_12_Nozzle"),
            ProductKey::new("AB_12", "Nozzle")
        );
        assert_eq!(
            store.resolve_key("ZZ_Unknown_Thing"),
            ProductKey::new("ZZ", "Unknown_Thing")
        );
    }

    #[test]
    fn remove_key_drops_all_duplicates_and_keeps_order() {
        let document = seeded(&[
            Product::new("A1", "Widget", Decimal::ONE),
            Product::new("B2", "Gadget", Decimal::TWO),
            Product::new("A1", "Widget", Decimal::TEN),
        ]);
        let mut store = CatalogStore::load(document.clone()).store;
        let writes_before = document.write_count();

        let removed = store.remove_key(&ProductKey::new("A1", "Widget")).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.products()[0].product_name, "Gadget");
        assert_eq!(document.write_count(), writes_before + 1);
    }

    #[test]
    fn remove_missing_key_does_not_rewrite() {
        let document = seeded(&[Product::new("A1", "Widget", Decimal::ONE)]);
        let mut store = CatalogStore::load(document.clone()).store;

        let removed = store.remove_key(&ProductKey::new("nope", "nothing")).unwrap();
        assert_eq!(removed, 0);
        assert_eq!(document.write_count(), 0);
    }

    #[test]
    fn unreadable_document_falls_back_and_reports() {
        let document = MemoryDocument::new("catalog");
        document.set_fail_reads(true);
        let loaded = CatalogStore::load(document.clone());

        assert_eq!(loaded.store.products(), default_products().as_slice());
        assert_eq!(loaded.notices.len(), 1);
        assert_eq!(document.write_count(), 1);
    }
}
