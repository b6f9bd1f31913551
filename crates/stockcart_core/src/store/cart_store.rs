//! Cart store: requested quantity per product identity.
//!
//! # Responsibility
//! - Load/save the flat `{ "<part>_<name>": qty }` cart document.
//! - Apply quantity deltas with a floor at zero.
//! - Price the cart against a catalog snapshot.
//!
//! # Invariants
//! - Quantities are never negative; an absent key reads as zero.
//! - Adjusting down to zero keeps the entry.
//! - Cart keys without a catalog record contribute nothing to the total.
//! - Totals saturate at `Decimal::MAX` instead of overflowing.
//! - Keys read from the document are written back in the form they were
//!   read, even when they do not name a catalog record.

use super::document::{read_json, write_json, Document};
use super::{Loaded, PersistResult};
use crate::model::product::{Product, ProductKey};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

const LOAD_EVENT: &str = "cart_load";
const SAVE_EVENT: &str = "cart_save";

/// Product quantities backed by one document.
#[derive(Debug)]
pub struct CartStore<D: Document> {
    document: D,
    quantities: BTreeMap<ProductKey, u32>,
    /// Document spelling of loaded keys; first spelling wins on merge.
    spellings: HashMap<ProductKey, String>,
}

impl<D: Document> CartStore<D> {
    /// Loads the cart document.
    ///
    /// `resolve` maps each rendered key to a structured key (usually
    /// `CatalogStore::resolve_key`). A missing or unparsable document yields
    /// an empty cart without rewriting it; parse/read failures are returned
    /// as notices. Negative stored quantities are clamped to zero.
    pub fn load<F>(document: D, resolve: F) -> Loaded<Self>
    where
        F: Fn(&str) -> ProductKey,
    {
        let mut notices = Vec::new();
        let raw = match read_json::<BTreeMap<String, i64>, _>(&document, LOAD_EVENT) {
            Ok(raw) => raw.unwrap_or_default(),
            Err(err) => {
                notices.push(err);
                BTreeMap::new()
            }
        };

        let mut quantities = BTreeMap::new();
        let mut spellings = HashMap::new();
        for (rendered, stored) in raw {
            if stored < 0 {
                warn!("event=cart_load module=store status=clamped stored_qty={stored}");
            }
            let qty = clamp_quantity(stored);
            let key = resolve(rendered.as_str());
            if key.to_string() != rendered {
                spellings.entry(key.clone()).or_insert(rendered);
            }
            let slot: &mut u32 = quantities.entry(key).or_default();
            *slot = slot.saturating_add(qty);
        }

        Loaded {
            store: Self {
                document,
                quantities,
                spellings,
            },
            notices,
        }
    }

    /// Writes the full mapping, replacing the document.
    ///
    /// Distinct keys that render to the same string are merged by summing.
    pub fn save(&self) -> PersistResult<()> {
        let mut rendered: BTreeMap<String, u32> = BTreeMap::new();
        for (key, qty) in &self.quantities {
            let spelling = match self.spellings.get(key) {
                Some(spelling) => spelling.clone(),
                None => key.to_string(),
            };
            let slot = rendered.entry(spelling).or_default();
            *slot = slot.saturating_add(*qty);
        }
        write_json(&self.document, &rendered, SAVE_EVENT)
    }

    /// Quantity for a key; zero when never added.
    pub fn quantity(&self, key: &ProductKey) -> u32 {
        self.quantities.get(key).copied().unwrap_or(0)
    }

    /// All entries, including those adjusted back to zero.
    pub fn entries(&self) -> &BTreeMap<ProductKey, u32> {
        &self.quantities
    }

    /// Sum of all quantities.
    pub fn total_units(&self) -> u64 {
        self.quantities.values().map(|qty| u64::from(*qty)).sum()
    }

    /// Applies `delta` with a floor at zero, stores the result even when it
    /// is zero, and persists. Returns the new quantity.
    ///
    /// The in-memory quantity is kept when the write fails.
    pub fn adjust(&mut self, key: &ProductKey, delta: i64) -> PersistResult<u32> {
        let current = self.quantity(key);
        let next = clamp_quantity(i64::from(current).saturating_add(delta));
        self.quantities.insert(key.clone(), next);
        debug!("event=cart_adjust module=store status=ok key={key} delta={delta} qty={next}");
        self.save()?;
        Ok(next)
    }

    /// Removes one entry and persists when it existed.
    pub fn remove(&mut self, key: &ProductKey) -> PersistResult<bool> {
        if self.quantities.remove(key).is_none() {
            return Ok(false);
        }
        self.spellings.remove(key);
        self.save()?;
        Ok(true)
    }

    /// Empties the cart and persists.
    pub fn clear(&mut self) -> PersistResult<()> {
        self.quantities.clear();
        self.spellings.clear();
        self.save()
    }

    /// Prices the cart against a catalog snapshot.
    ///
    /// Each key is priced by the first catalog record carrying it. Entries
    /// with no matching record are skipped. A sum beyond the decimal range
    /// saturates at `Decimal::MAX`.
    pub fn compute_total(&self, products: &[Product]) -> Decimal {
        let prices = price_index(products);
        self.quantities
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .fold(Decimal::ZERO, |total, (key, qty)| match prices.get(key) {
                Some(price) => {
                    let amount = line_amount(*price, *qty);
                    total.checked_add(amount).unwrap_or_else(|| {
                        warn!("event=cart_total module=store status=saturated");
                        Decimal::MAX
                    })
                }
                None => {
                    debug!("event=cart_total module=store status=lookup_miss key={key}");
                    total
                }
            })
    }
}

/// `price * qty`, saturating at the decimal range bounds.
pub(crate) fn line_amount(price: Decimal, qty: u32) -> Decimal {
    price.checked_mul(Decimal::from(qty)).unwrap_or_else(|| {
        warn!("event=cart_line module=store status=saturated qty={qty}");
        if price.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// Builds a key -> price index where the first record for a key wins.
fn price_index(products: &[Product]) -> HashMap<ProductKey, Decimal> {
    let mut prices = HashMap::with_capacity(products.len());
    for product in products {
        prices.entry(product.key()).or_insert(product.price);
    }
    prices
}

fn clamp_quantity(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
