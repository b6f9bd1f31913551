//! Built-in default catalog.
//!
//! Used when the catalog document is missing or unreadable, and by the
//! explicit restore-defaults operation.

use super::product::Product;
use rust_decimal::Decimal;

struct DefaultRow {
    part_number: &'static str,
    product_name: &'static str,
    description: &'static str,
    country: &'static str,
    price_cents: i64,
    barcode: &'static str,
}

const DEFAULT_ROWS: &[DefaultRow] = &[
    DefaultRow {
        part_number: "06008A7E01",
        product_name: "Easy Aquatak 100 Long Lance",
        description: "ماكينة غسيل ضغط عالي 100 بار - 1200 وات - طول الخرطوم 3 متر",
        country: "China",
        price_cents: 366_222,
        barcode: "4059952539447",
    },
    DefaultRow {
        part_number: "06008A7F00",
        product_name: "Easy Aquatak 110",
        description: "ماكينة غسيل ضغط عالي 110 بار - 1300 وات - طول الخرطوم 3 متر",
        country: "China",
        price_cents: 418_500,
        barcode: "3165140935685",
    },
    DefaultRow {
        part_number: "06008A7A00",
        product_name: "Universal Aquatak 125",
        description: "ماكينة غسيل ضغط عالي 125 بار - 1500 وات - طول الخرطوم 5 متر",
        country: "China",
        price_cents: 560_700,
        barcode: "3165140883610",
    },
    DefaultRow {
        part_number: "06008A7C00",
        product_name: "Universal Aquatak 135",
        description: "ماكينة غسيل ضغط عالي 135 بار - 1900 وات - طول الخرطوم 7 متر",
        country: "China",
        price_cents: 727_749,
        barcode: "3165140883795",
    },
    DefaultRow {
        part_number: "06008A7D00",
        product_name: "Advanced Aquatak 140",
        description: "ماكينة غسيل ضغط عالي 140 بار - 2100 وات - طول الخرطوم 8 متر",
        country: "China",
        price_cents: 1_151_382,
        barcode: "3165140906470",
    },
    DefaultRow {
        part_number: "0600910600",
        product_name: "GHP 5-65X PROFESSIONAL",
        description: "Rated input power 2400 W - Max. pressure 160 bar - Hose length 10m",
        country: "China",
        price_cents: 3_372_365,
        barcode: "3165140810173",
    },
    DefaultRow {
        part_number: "0600910800",
        product_name: "GHP 5-75X PROFESSIONAL",
        description: "Rated input power 2600 W - Max. pressure 185 bar - Hose length 10m",
        country: "China",
        price_cents: 3_967_488,
        barcode: "3165140810272",
    },
    DefaultRow {
        part_number: "0600910300",
        product_name: "GHP 8-15 XD PROFESSIONAL",
        description: "Rated input power 4000 W - Max. pressure 150 bar - Hose length 15m",
        country: "China",
        price_cents: 6_347_981,
        barcode: "3165140716826",
    },
    DefaultRow {
        part_number: "F016800572",
        product_name: "Car Cleaning Kit",
        description: "طقم تنظيف السيارات لتنظيف السيارة من جميع الأتربة وتوافق مع الموديلات الآتية",
        country: "China",
        price_cents: 125_349,
        barcode: "3165140941785",
    },
    DefaultRow {
        part_number: "00007200",
        product_name: "Bosch GlassVAC Cordless Window Vacuum",
        description: "هذه النافذة اللاسلكية تقوم بتنظيف النوافذ بكفاءة عالية بفضل خبرة بوش في هذا المجال.",
        country: "China",
        price_cents: 277_500,
        barcode: "3165140976374",
    },
];

/// Returns a fresh copy of the built-in product list, in display order.
pub fn default_products() -> Vec<Product> {
    DEFAULT_ROWS
        .iter()
        .map(|row| Product {
            part_number: row.part_number.to_string(),
            product_name: row.product_name.to_string(),
            description: row.description.to_string(),
            country: row.country.to_string(),
            price: Decimal::new(row.price_cents, 2),
            barcode: row.barcode.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::default_products;
    use std::collections::HashSet;

    #[test]
    fn defaults_are_non_empty_and_priced() {
        let products = default_products();
        assert_eq!(products.len(), 10);
        assert!(products
            .iter()
            .all(|product| !product.product_name.is_empty() && product.price.is_sign_positive()));
    }

    #[test]
    fn default_keys_are_distinct() {
        let products = default_products();
        let keys: HashSet<_> = products.iter().map(|product| product.key()).collect();
        assert_eq!(keys.len(), products.len());
    }
}
