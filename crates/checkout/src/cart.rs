//! Cart service: price resolution plus atomic cart mutation.

use common::{AccountId, LineId};
use domain::{Cart, CartMutation, Money};
use store::Store;

use crate::error::{CheckoutError, Result};
use crate::services::catalog::Catalog;

/// High-level cart operations for a single account.
///
/// Price resolution consults the catalog once, at add time; the
/// resolved price is frozen onto the cart line. The mutation itself
/// runs inside the store's atomic region, so two concurrent adds for
/// the same account cannot lose an update.
#[derive(Clone)]
pub struct CartService<S, C> {
    store: S,
    catalog: C,
}

impl<S, C> CartService<S, C>
where
    S: Store,
    C: Catalog,
{
    /// Creates a new cart service.
    pub fn new(store: S, catalog: C) -> Self {
        Self { store, catalog }
    }

    /// Adds `delta` units of a (product, variant) pair to the cart.
    ///
    /// A positive delta merges into an existing line or appends a new
    /// one; a delta that brings the line to zero or below removes it.
    #[tracing::instrument(skip(self))]
    pub async fn add_line(
        &self,
        account_id: AccountId,
        product_id: &str,
        variant: Option<&str>,
        delta: i64,
    ) -> Result<Cart> {
        // A non-positive delta can only shrink or remove an existing
        // line, never create one, so it needs no price resolution and
        // must keep working after the product is delisted.
        let mutation = if delta <= 0 {
            CartMutation::AddLine {
                product_id: product_id.to_string(),
                name: String::new(),
                image: None,
                variant: variant.map(str::to_string),
                unit_price: Money::zero(),
                delta,
            }
        } else {
            let product = self
                .catalog
                .product(product_id)
                .await?
                .ok_or_else(|| CheckoutError::ProductNotFound(product_id.to_string()))?;

            CartMutation::AddLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                image: product.primary_image().map(str::to_string),
                variant: variant.map(str::to_string),
                unit_price: product.price_for(variant),
                delta,
            }
        };

        Ok(self.store.mutate_cart(account_id, mutation).await?)
    }

    /// Removes a line by its identifier.
    #[tracing::instrument(skip(self))]
    pub async fn remove_line(&self, account_id: AccountId, line_id: LineId) -> Result<Cart> {
        Ok(self
            .store
            .mutate_cart(account_id, CartMutation::RemoveLine { line_id })
            .await?)
    }

    /// Returns the account's cart; an account with no cart yet gets an
    /// empty cart.
    pub async fn get_cart(&self, account_id: AccountId) -> Result<Cart> {
        Ok(self.store.cart(account_id).await?)
    }
}
