//! Product domain model.
//!
//! # Responsibility
//! - Define the canonical product record persisted in the catalog document.
//! - Define the structured identity used to correlate catalog rows and cart
//!   entries.
//! - Validate operator input before it becomes a catalog record.
//!
//! # Invariants
//! - `ProductKey` is derived from `part_number` + `product_name` and is not
//!   unique across the catalog.
//! - Records built from a `ProductDraft` have a non-blank name and a price
//!   strictly greater than zero, stored exactly as entered.
//! - Whole-number prices are written as JSON integers, others as JSON floats.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Separator used by the rendered form of a `ProductKey`.
pub const KEY_SEPARATOR: char = '_';

/// Catalog record.
///
/// Field names on disk follow the camelCase schema; the legacy column names
/// (`Part Number`, `Price (EGP)`, ...) are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Vendor part number. May be blank or repeated.
    #[serde(
        rename = "partNumber",
        alias = "Part Number",
        default,
        deserialize_with = "text_or_null"
    )]
    pub part_number: String,
    #[serde(
        rename = "productName",
        alias = "Product Name",
        default,
        deserialize_with = "text_or_null"
    )]
    pub product_name: String,
    #[serde(
        rename = "description",
        alias = "Description",
        default,
        deserialize_with = "text_or_null"
    )]
    pub description: String,
    /// Country of origin.
    #[serde(
        rename = "country",
        alias = "Country",
        default,
        deserialize_with = "text_or_null"
    )]
    pub country: String,
    /// Currency-agnostic unit price, written as a JSON number.
    #[serde(
        rename = "price",
        alias = "Price (EGP)",
        serialize_with = "price_number",
        deserialize_with = "rust_decimal::serde::float::deserialize"
    )]
    pub price: Decimal,
    /// Free-form identifier. Numeric barcodes are read into their decimal
    /// string form; no checksum or length validation happens.
    #[serde(
        rename = "barcode",
        alias = "Barcode",
        default,
        deserialize_with = "barcode_text"
    )]
    pub barcode: String,
}

impl Product {
    /// Creates a record from the two identity fields and a price.
    ///
    /// Does not validate; use `ProductDraft` for operator input.
    pub fn new(
        part_number: impl Into<String>,
        product_name: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            part_number: part_number.into(),
            product_name: product_name.into(),
            description: String::new(),
            country: String::new(),
            price,
            barcode: String::new(),
        }
    }

    /// Returns the composite identity of this record.
    pub fn key(&self) -> ProductKey {
        ProductKey::new(self.part_number.as_str(), self.product_name.as_str())
    }

    /// Returns whether this record carries the given identity.
    pub fn has_key(&self, key: &ProductKey) -> bool {
        self.part_number == key.part_number && self.product_name == key.product_name
    }
}

/// Structured composite identity of a product.
///
/// Carried by value next to records instead of being re-derived from a
/// joined string. The rendered `part_product` form only appears at the cart
/// document boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductKey {
    pub part_number: String,
    pub product_name: String,
}

impl ProductKey {
    pub fn new(part_number: impl Into<String>, product_name: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            product_name: product_name.into(),
        }
    }

    /// Parses a rendered key by splitting at the first separator.
    ///
    /// A part number containing the separator cannot be recovered this way;
    /// callers holding a catalog should prefer `CatalogStore::resolve_key`.
    /// A string without any separator is read as a blank part number.
    pub fn parse(rendered: &str) -> Self {
        match rendered.split_once(KEY_SEPARATOR) {
            Some((part_number, product_name)) => Self::new(part_number, product_name),
            None => Self::new("", rendered),
        }
    }
}

impl Display for ProductKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{KEY_SEPARATOR}{}",
            self.part_number, self.product_name
        )
    }
}

/// Validation failures for operator-supplied product input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductValidationError {
    /// Product name is empty or whitespace only.
    EmptyProductName,
    /// Price is zero or negative.
    NonPositivePrice(Decimal),
    /// Price text is not a decimal number.
    InvalidPrice(String),
}

impl Display for ProductValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyProductName => write!(f, "product name is required"),
            Self::NonPositivePrice(price) => {
                write!(f, "price must be greater than 0, got {price}")
            }
            Self::InvalidPrice(text) => write!(f, "price `{text}` is not a decimal number"),
        }
    }
}

impl Error for ProductValidationError {}

/// Operator input for a new catalog record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub part_number: String,
    pub product_name: String,
    pub description: String,
    pub country: String,
    pub price: Decimal,
    pub barcode: String,
}

impl ProductDraft {
    /// Creates a draft with the required fields; optional fields stay blank.
    pub fn new(product_name: impl Into<String>, price: Decimal) -> Self {
        Self {
            product_name: product_name.into(),
            price,
            ..Self::default()
        }
    }

    /// Validates the draft and converts it into a catalog record.
    ///
    /// # Errors
    /// - `EmptyProductName` when the name is blank.
    /// - `NonPositivePrice` when the price is not above zero.
    pub fn into_product(self) -> Result<Product, ProductValidationError> {
        if self.product_name.trim().is_empty() {
            return Err(ProductValidationError::EmptyProductName);
        }
        if self.price <= Decimal::ZERO {
            return Err(ProductValidationError::NonPositivePrice(self.price));
        }

        Ok(Product {
            part_number: self.part_number,
            product_name: self.product_name,
            description: self.description,
            country: self.country,
            price: self.price,
            barcode: self.barcode,
        })
    }
}

/// Coerces textual price input into the record's decimal type.
///
/// Accepts plain and scientific notation; sign checks happen in
/// `ProductDraft::into_product`.
pub fn parse_price(text: &str) -> Result<Decimal, ProductValidationError> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ProductValidationError::InvalidPrice(trimmed.to_string()))
}

/// Coerces a binary float (e.g. a spinner widget value) into a decimal price.
pub fn price_from_f64(value: f64) -> Result<Decimal, ProductValidationError> {
    Decimal::try_from(value).map_err(|_| ProductValidationError::InvalidPrice(value.to_string()))
}

fn price_number<S>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if price.fract().is_zero() {
        if let Some(whole) = price.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }
    rust_decimal::serde::float::serialize(price, serializer)
}

fn text_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BarcodeValue {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

fn barcode_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<BarcodeValue>::deserialize(deserializer)?;
    Ok(match value {
        None => String::new(),
        Some(BarcodeValue::Text(text)) => text,
        Some(BarcodeValue::Unsigned(number)) => number.to_string(),
        Some(BarcodeValue::Signed(number)) => number.to_string(),
        // Spreadsheet exports widen integer columns to floats.
        Some(BarcodeValue::Float(number)) if number.fract() == 0.0 && number.is_finite() => {
            format!("{number:.0}")
        }
        Some(BarcodeValue::Float(number)) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{
        parse_price, price_from_f64, Product, ProductDraft, ProductKey, ProductValidationError,
    };
    use rust_decimal::Decimal;

    #[test]
    fn key_renders_with_underscore_separator() {
        let key = ProductKey::new("A1", "Widget");
        assert_eq!(key.to_string(), "A1_Widget");
    }

    #[test]
    fn parse_splits_at_first_separator_only() {
        let key = ProductKey::parse("A1_Widget_Deluxe");
        assert_eq!(key, ProductKey::new("A1", "Widget_Deluxe"));

        let blank_part = ProductKey::parse("_Widget");
        assert_eq!(blank_part, ProductKey::new("", "Widget"));

        let no_separator = ProductKey::parse("Widget");
        assert_eq!(no_separator, ProductKey::new("", "Widget"));
    }

    #[test]
    fn draft_rejects_blank_name_and_non_positive_price() {
        let blank = ProductDraft::new("  ", Decimal::new(100, 2));
        assert_eq!(
            blank.into_product().unwrap_err(),
            ProductValidationError::EmptyProductName
        );

        let free = ProductDraft::new("Widget", Decimal::ZERO);
        assert!(matches!(
            free.into_product().unwrap_err(),
            ProductValidationError::NonPositivePrice(_)
        ));

        let negative = ProductDraft::new("Widget", Decimal::new(-1, 2));
        assert!(matches!(
            negative.into_product().unwrap_err(),
            ProductValidationError::NonPositivePrice(_)
        ));
    }

    #[test]
    fn draft_keeps_price_as_entered() {
        let tiny = ProductDraft::new("Washer", Decimal::new(4, 3))
            .into_product()
            .unwrap();
        assert_eq!(tiny.price, Decimal::new(4, 3));

        let product = ProductDraft::new("Widget", Decimal::new(10_005, 3))
            .into_product()
            .unwrap();
        assert_eq!(product.price, Decimal::new(10_005, 3));
    }

    #[test]
    fn whole_prices_are_written_as_integers() {
        let whole = serde_json::to_value(Product::new("", "Pump", Decimal::new(2775, 0))).unwrap();
        assert_eq!(whole["price"], serde_json::json!(2775));

        let cents = serde_json::to_value(Product::new("", "Hose", Decimal::new(1250, 2))).unwrap();
        assert_eq!(cents["price"], serde_json::json!(12.5));

        let scaled = serde_json::to_value(Product::new("", "Kit", Decimal::new(100, 2))).unwrap();
        assert_eq!(scaled["price"], serde_json::json!(1));
    }

    #[test]
    fn parse_price_accepts_decimal_text() {
        assert_eq!(parse_price(" 12.50 ").unwrap(), Decimal::new(1250, 2));
        assert!(matches!(
            parse_price("twelve").unwrap_err(),
            ProductValidationError::InvalidPrice(_)
        ));
    }

    #[test]
    fn price_from_f64_keeps_two_decimal_places() {
        assert_eq!(price_from_f64(3662.22).unwrap(), Decimal::new(366_222, 2));
        assert!(price_from_f64(f64::NAN).is_err());
    }

    #[test]
    fn reads_legacy_column_names_and_numeric_barcode() {
        let json = r#"{
            "Part Number": null,
            "Product Name": "Car Cleaning Kit",
            "Description": "kit",
            "Country": "China",
            "Price (EGP)": 1253.49,
            "Barcode": 3165140941785
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.part_number, "");
        assert_eq!(product.price, Decimal::new(125_349, 2));
        assert_eq!(product.barcode, "3165140941785");
    }

    #[test]
    fn float_barcode_keeps_integer_digits() {
        let json = r#"{"productName": "x", "price": 1, "barcode": 3165140976374.0}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.barcode, "3165140976374");
    }
}
