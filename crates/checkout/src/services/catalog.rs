//! Catalog collaborator trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Product;

use crate::error::Result;

/// Trait for the catalog collaborator.
///
/// Catalog CRUD is a separate system; the checkout core only reads
/// product data when resolving prices at add-to-cart time.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetches a product by its catalog ID.
    async fn product(&self, product_id: &str) -> Result<Option<Product>>;
}

/// In-memory catalog for testing and development.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<HashMap<String, Product>>>,
}

impl InMemoryCatalog {
    /// Creates a new empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product.
    pub fn insert(&self, product: Product) {
        self.state
            .write()
            .unwrap()
            .insert(product.id.clone(), product);
    }

    /// Returns the number of products.
    pub fn product_count(&self) -> usize {
        self.state.read().unwrap().len()
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn product(&self, product_id: &str) -> Result<Option<Product>> {
        Ok(self.state.read().unwrap().get(product_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Money;

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(Product {
            id: "SOAP-NEEM".to_string(),
            name: "Neem Soap".to_string(),
            images: vec![],
            base_price: Money::from_paise(90),
            variants: vec![],
        });

        let product = catalog.product("SOAP-NEEM").await.unwrap().unwrap();
        assert_eq!(product.name, "Neem Soap");
        assert!(catalog.product("SOAP-ROSE").await.unwrap().is_none());
    }
}
