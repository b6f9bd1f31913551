//! Substring filtering over catalog records.

use crate::model::product::Product;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Field selection for catalog search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Case-insensitive match on product name OR description.
    #[default]
    NameOrDescription,
    /// Case-sensitive match on the barcode string.
    Barcode,
    /// Case-insensitive match on the part number.
    PartNumber,
}

impl SearchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameOrDescription => "name",
            Self::Barcode => "barcode",
            Self::PartNumber => "part-number",
        }
    }
}

impl Display for SearchMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown search mode text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSearchMode(pub String);

impl Display for UnknownSearchMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported search mode `{}`; expected name|barcode|part-number",
            self.0
        )
    }
}

impl Error for UnknownSearchMode {}

impl FromStr for SearchMode {
    type Err = UnknownSearchMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" | "description" | "name-or-description" => Ok(Self::NameOrDescription),
            "barcode" => Ok(Self::Barcode),
            "part-number" | "part_number" | "part" => Ok(Self::PartNumber),
            other => Err(UnknownSearchMode(other.to_string())),
        }
    }
}

/// Returns the records matching `query` under `mode`, in catalog order.
///
/// An empty query returns every record.
pub fn search_products(products: &[Product], query: &str, mode: SearchMode) -> Vec<Product> {
    if query.is_empty() {
        return products.to_vec();
    }

    let needle = match mode {
        SearchMode::Barcode => query.to_string(),
        SearchMode::NameOrDescription | SearchMode::PartNumber => query.to_lowercase(),
    };

    products
        .iter()
        .filter(|product| matches(product, needle.as_str(), mode))
        .cloned()
        .collect()
}

fn matches(product: &Product, needle: &str, mode: SearchMode) -> bool {
    match mode {
        SearchMode::NameOrDescription => {
            contains_folded(&product.product_name, needle)
                || contains_folded(&product.description, needle)
        }
        SearchMode::Barcode => product.barcode.contains(needle),
        SearchMode::PartNumber => contains_folded(&product.part_number, needle),
    }
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    haystack.to_lowercase().contains(folded_needle)
}

#[cfg(test)]
mod tests {
    use super::{search_products, SearchMode};
    use crate::model::product::Product;
    use rust_decimal::Decimal;

    fn product(part: &str, name: &str, description: &str, barcode: &str) -> Product {
        let mut product = Product::new(part, name, Decimal::ONE);
        product.description = description.to_string();
        product.barcode = barcode.to_string();
        product
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("06008A7E01", "Easy Aquatak 100", "pressure washer", "4059952539447"),
            product("0600910600", "GHP 5-65X", "Rated input power 2400 W", "3165140810173"),
            product("F016800572", "Car Cleaning Kit", "kit", "3165140941785"),
        ]
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let products = catalog();
        let found = search_products(&products, "", SearchMode::Barcode);
        assert_eq!(found, products);
    }

    #[test]
    fn name_or_description_is_case_insensitive_or() {
        let products = catalog();
        let by_name = search_products(&products, "aquatak", SearchMode::NameOrDescription);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].product_name, "Easy Aquatak 100");

        let by_description = search_products(&products, "POWER", SearchMode::NameOrDescription);
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].part_number, "0600910600");
    }

    #[test]
    fn barcode_matches_substring_and_keeps_order() {
        let products = catalog();
        let found = search_products(&products, "316514", SearchMode::Barcode);
        let parts: Vec<_> = found.iter().map(|p| p.part_number.as_str()).collect();
        assert_eq!(parts, vec!["0600910600", "F016800572"]);
    }

    #[test]
    fn part_number_is_case_insensitive() {
        let products = catalog();
        let found = search_products(&products, "f0168", SearchMode::PartNumber);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].product_name, "Car Cleaning Kit");
    }

    #[test]
    fn mode_parses_from_cli_text() {
        assert_eq!("Barcode".parse::<SearchMode>().unwrap(), SearchMode::Barcode);
        assert_eq!(
            "part-number".parse::<SearchMode>().unwrap(),
            SearchMode::PartNumber
        );
        assert!("sku".parse::<SearchMode>().is_err());
    }
}
