//! Catalog snapshot types.
//!
//! Catalog management itself is a separate system; the checkout core
//! only reads product data when resolving the unit price for a cart
//! line. These types mirror what the catalog collaborator returns.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A purchasable configuration of a product (e.g., a 250g bar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Display label, e.g. "250g".
    pub label: String,

    /// Unit description, e.g. "g" or "bar". Some catalog entries carry
    /// the size here instead of in the label.
    pub unit: String,

    /// Price for this variant.
    pub price: Money,
}

/// A product as supplied by the catalog collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier (SKU).
    pub id: String,

    /// Human-readable product name.
    pub name: String,

    /// Image URLs; the first one is copied onto cart lines.
    pub images: Vec<String>,

    /// Price used when the product has no variants.
    pub base_price: Money,

    /// Purchasable variants, each with its own price.
    pub variants: Vec<Variant>,
}

impl Product {
    /// Returns the first image URL, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Resolves the unit price for a requested variant.
    ///
    /// Matches the requested variant against the variant list by label
    /// or unit. If nothing matches, falls back to the first variant's
    /// price, then to the base price.
    pub fn price_for(&self, variant: Option<&str>) -> Money {
        if let Some(wanted) = variant
            && let Some(v) = self
                .variants
                .iter()
                .find(|v| v.label == wanted || v.unit == wanted)
        {
            return v.price;
        }

        self.variants
            .first()
            .map(|v| v.price)
            .unwrap_or(self.base_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soap() -> Product {
        Product {
            id: "SOAP-NEEM".to_string(),
            name: "Neem Soap".to_string(),
            images: vec!["https://cdn.example/neem.jpg".to_string()],
            base_price: Money::from_paise(90),
            variants: vec![
                Variant {
                    label: "250g".to_string(),
                    unit: "g".to_string(),
                    price: Money::from_paise(100),
                },
                Variant {
                    label: "500g".to_string(),
                    unit: "g".to_string(),
                    price: Money::from_paise(180),
                },
            ],
        }
    }

    #[test]
    fn test_price_for_matching_label() {
        assert_eq!(soap().price_for(Some("500g")).paise(), 180);
    }

    #[test]
    fn test_price_for_matching_unit() {
        assert_eq!(soap().price_for(Some("g")).paise(), 100);
    }

    #[test]
    fn test_price_for_unknown_variant_falls_back_to_first() {
        assert_eq!(soap().price_for(Some("1kg")).paise(), 100);
    }

    #[test]
    fn test_price_for_no_variants_uses_base_price() {
        let mut product = soap();
        product.variants.clear();
        assert_eq!(product.price_for(Some("250g")).paise(), 90);
        assert_eq!(product.price_for(None).paise(), 90);
    }
}
