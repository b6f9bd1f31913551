//! Document locations for the inventory stores.
//!
//! Paths are the only configuration surface; relative paths resolve against
//! the process working directory.

use std::path::{Path, PathBuf};

/// Default catalog document file name.
pub const DEFAULT_CATALOG_FILE: &str = "inventory_data.json";
/// Default cart document file name.
pub const DEFAULT_CART_FILE: &str = "cart_data.json";

/// Where the catalog, cart, and backups live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub catalog: PathBuf,
    pub cart: PathBuf,
    pub backup_dir: PathBuf,
}

impl Default for StorePaths {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG_FILE),
            cart: PathBuf::from(DEFAULT_CART_FILE),
            backup_dir: PathBuf::from("."),
        }
    }
}

impl StorePaths {
    /// Default file names placed inside `base`.
    pub fn in_dir(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            catalog: base.join(DEFAULT_CATALOG_FILE),
            cart: base.join(DEFAULT_CART_FILE),
            backup_dir: base.to_path_buf(),
        }
    }

    pub fn with_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog = path.into();
        self
    }

    pub fn with_cart(mut self, path: impl Into<PathBuf>) -> Self {
        self.cart = path.into();
        self
    }

    pub fn with_backup_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_dir = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::StorePaths;
    use std::path::PathBuf;

    #[test]
    fn defaults_are_relative_file_names() {
        let paths = StorePaths::default();
        assert_eq!(paths.catalog, PathBuf::from("inventory_data.json"));
        assert_eq!(paths.cart, PathBuf::from("cart_data.json"));
    }

    #[test]
    fn overrides_replace_single_locations() {
        let paths = StorePaths::in_dir("/srv/shop").with_cart("/tmp/cart.json");
        assert_eq!(paths.catalog, PathBuf::from("/srv/shop/inventory_data.json"));
        assert_eq!(paths.cart, PathBuf::from("/tmp/cart.json"));
        assert_eq!(paths.backup_dir, PathBuf::from("/srv/shop"));
    }
}
