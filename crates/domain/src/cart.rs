//! Cart aggregate: per-account lines with price snapshots.

use chrono::{DateTime, Utc};
use common::{AccountId, LineId};
use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::money::Money;

/// One (product, variant) entry in a cart.
///
/// The unit price is frozen at add time so historical cart totals stay
/// stable even if the catalog price changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Line identifier, used by the remove operation.
    pub id: LineId,

    /// Catalog identifier of the product.
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Primary image URL at time of adding (frozen).
    pub image: Option<String>,

    /// Requested variant, if any. Part of the line identity: the same
    /// product in two sizes occupies two lines.
    pub variant: Option<String>,

    /// Quantity, always >= 1. Zero-quantity lines are removed.
    pub quantity: u32,

    /// Price per unit at time of adding (frozen).
    pub unit_price: Money,
}

impl CartLine {
    /// Returns the total price for this line (quantity * unit price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    fn matches(&self, product_id: &str, variant: Option<&str>) -> bool {
        self.product_id == product_id && self.variant.as_deref() == variant
    }
}

/// A mutation applied to a cart.
///
/// Mutations are pure data so the store can replay them inside its
/// atomic read-modify-write region, which is what prevents two
/// concurrent adds from losing an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CartMutation {
    /// Add `delta` units of a (product, variant) pair, merging with an
    /// existing line when present. A resulting quantity <= 0 removes
    /// the line.
    AddLine {
        product_id: String,
        name: String,
        image: Option<String>,
        variant: Option<String>,
        unit_price: Money,
        delta: i64,
    },

    /// Remove a line by its identifier.
    RemoveLine { line_id: LineId },

    /// Remove all lines. Used by the order committer after a
    /// successful commit.
    Clear,
}

/// Shopping cart for a single account.
///
/// Invariants:
/// - at most one line per distinct (product, variant) pair;
/// - every line has quantity >= 1;
/// - `total` always equals the sum of the line totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Owning account.
    pub account_id: AccountId,

    /// Cart lines in insertion order.
    pub lines: Vec<CartLine>,

    /// Denormalized running total, recomputed on every mutation.
    pub total: Money,

    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Creates an empty cart for an account.
    pub fn empty(account_id: AccountId) -> Self {
        Self {
            account_id,
            lines: Vec::new(),
            total: Money::zero(),
            updated_at: Utc::now(),
        }
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the line for a (product, variant) pair, if present.
    pub fn find_line(&self, product_id: &str, variant: Option<&str>) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.matches(product_id, variant))
    }

    /// Applies a mutation, recomputing the total.
    pub fn apply(&mut self, mutation: CartMutation) -> Result<(), CartError> {
        match mutation {
            CartMutation::AddLine {
                product_id,
                name,
                image,
                variant,
                unit_price,
                delta,
            } => self.apply_add(product_id, name, image, variant, unit_price, delta)?,
            CartMutation::RemoveLine { line_id } => {
                let before = self.lines.len();
                self.lines.retain(|l| l.id != line_id);
                if self.lines.len() == before {
                    return Err(CartError::LineNotFound { line_id });
                }
            }
            CartMutation::Clear => self.lines.clear(),
        }

        self.total = self.lines.iter().map(CartLine::line_total).sum();
        self.updated_at = Utc::now();
        Ok(())
    }

    fn apply_add(
        &mut self,
        product_id: String,
        name: String,
        image: Option<String>,
        variant: Option<String>,
        unit_price: Money,
        delta: i64,
    ) -> Result<(), CartError> {
        if let Some(pos) = self
            .lines
            .iter()
            .position(|l| l.matches(&product_id, variant.as_deref()))
        {
            let new_quantity = self.lines[pos].quantity as i64 + delta;
            if new_quantity <= 0 {
                self.lines.remove(pos);
            } else {
                self.lines[pos].quantity = u32::try_from(new_quantity)
                    .map_err(|_| CartError::QuantityTooLarge {
                        quantity: new_quantity,
                    })?;
            }
            return Ok(());
        }

        // Decrementing a line that does not exist must not create a
        // negative-quantity line.
        if delta <= 0 {
            return Err(CartError::NoSuchLine {
                product_id,
                variant,
            });
        }

        let quantity = u32::try_from(delta)
            .map_err(|_| CartError::QuantityTooLarge { quantity: delta })?;

        self.lines.push(CartLine {
            id: LineId::new(),
            product_id,
            name,
            image,
            variant,
            quantity,
            unit_price,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(variant: &str, price: i64, delta: i64) -> CartMutation {
        CartMutation::AddLine {
            product_id: "SOAP-NEEM".to_string(),
            name: "Neem Soap".to_string(),
            image: None,
            variant: Some(variant.to_string()),
            unit_price: Money::from_paise(price),
            delta,
        }
    }

    #[test]
    fn test_add_creates_line_with_snapshot_price() {
        let mut cart = Cart::empty(AccountId::new());
        cart.apply(add("250g", 100, 2)).unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.total.paise(), 200);
    }

    #[test]
    fn test_add_same_pair_merges_into_one_line() {
        let mut cart = Cart::empty(AccountId::new());
        cart.apply(add("250g", 100, 2)).unwrap();
        cart.apply(add("250g", 100, 3)).unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 5);
        assert_eq!(cart.total.paise(), 500);
    }

    #[test]
    fn test_distinct_variants_occupy_distinct_lines() {
        let mut cart = Cart::empty(AccountId::new());
        cart.apply(add("250g", 100, 2)).unwrap();
        cart.apply(add("500g", 180, 1)).unwrap();

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.total.paise(), 380);
    }

    #[test]
    fn test_plus_two_minus_two_leaves_cart_empty() {
        let mut cart = Cart::empty(AccountId::new());
        cart.apply(add("250g", 100, 2)).unwrap();
        cart.apply(add("250g", 100, -2)).unwrap();

        assert!(cart.is_empty());
        assert!(cart.total.is_zero());
    }

    #[test]
    fn test_decrement_of_missing_line_is_rejected() {
        let mut cart = Cart::empty(AccountId::new());
        let err = cart.apply(add("250g", 100, -1)).unwrap_err();
        assert!(matches!(err, CartError::NoSuchLine { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_beyond_line_capacity_is_rejected() {
        let mut cart = Cart::empty(AccountId::new());
        let err = cart
            .apply(add("250g", 100, u32::MAX as i64 + 2))
            .unwrap_err();

        assert!(matches!(err, CartError::QuantityTooLarge { .. }));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_merge_beyond_line_capacity_is_rejected() {
        let mut cart = Cart::empty(AccountId::new());
        cart.apply(add("250g", 100, 2)).unwrap();

        let err = cart.apply(add("250g", 100, u32::MAX as i64)).unwrap_err();
        assert!(matches!(err, CartError::QuantityTooLarge { .. }));

        // The failed merge left the line untouched.
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.total.paise(), 200);
    }

    #[test]
    fn test_remove_line_by_id() {
        let mut cart = Cart::empty(AccountId::new());
        cart.apply(add("250g", 100, 2)).unwrap();
        let line_id = cart.lines[0].id;

        cart.apply(CartMutation::RemoveLine { line_id }).unwrap();
        assert!(cart.is_empty());
        assert!(cart.total.is_zero());
    }

    #[test]
    fn test_remove_unknown_line_fails() {
        let mut cart = Cart::empty(AccountId::new());
        let err = cart
            .apply(CartMutation::RemoveLine {
                line_id: LineId::new(),
            })
            .unwrap_err();
        assert!(matches!(err, CartError::LineNotFound { .. }));
    }

    #[test]
    fn test_clear_resets_total() {
        let mut cart = Cart::empty(AccountId::new());
        cart.apply(add("250g", 100, 2)).unwrap();
        cart.apply(CartMutation::Clear).unwrap();

        assert!(cart.is_empty());
        assert!(cart.total.is_zero());
    }

    #[test]
    fn test_price_changes_do_not_affect_existing_lines() {
        let mut cart = Cart::empty(AccountId::new());
        cart.apply(add("250g", 100, 1)).unwrap();
        // Catalog price moved; the merge keeps the snapshot price.
        cart.apply(add("250g", 120, 1)).unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].unit_price.paise(), 100);
        assert_eq!(cart.total.paise(), 200);
    }
}
