use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::CatalogError;
use crate::models::{Product, ProductDetails, ProductType};

/// In-memory product catalog.
///
/// The map and the id counter share one lock, so allocating an id and
/// storing the record happen as a single step. Ids start at 1 and are never
/// handed out twice, even after the product is deleted.
#[derive(Debug)]
pub struct Catalog {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    /// Keyed by the decimal form of the id, which is how requests address it.
    products: HashMap<String, Product>,
    next_id: u64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                products: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    pub async fn create(&self, details: &ProductDetails) -> Result<u64, CatalogError> {
        let valid = details.validate()?;

        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        inner.products.insert(id.to_string(), valid.into_product(id));

        debug!(id, total = inner.products.len(), "Stored product");
        Ok(id)
    }

    /// Every product, or only those of `kind` when given. Sorted by id.
    pub async fn list(&self, kind: Option<&str>) -> Result<Vec<Product>, CatalogError> {
        let kind = kind.map(str::parse::<ProductType>).transpose()?;

        let inner = self.inner.read().await;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| kind.map_or(true, |k| p.kind == k))
            .cloned()
            .collect();
        drop(inner);

        products.sort_unstable_by_key(|p| p.id);
        Ok(products)
    }

    pub async fn get(&self, id: &str) -> Result<Product, CatalogError> {
        self.inner
            .read()
            .await
            .products
            .get(id)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        let mut inner = self.inner.write().await;
        if inner.products.remove(id).is_none() {
            return Err(CatalogError::NotFound);
        }

        debug!(id, total = inner.products.len(), "Removed product");
        Ok(())
    }

    /// Replaces name, type and inventory of an existing product.
    ///
    /// The payload is validated before the lookup: an invalid body is
    /// reported as such even when `id` does not exist.
    pub async fn update(&self, id: &str, details: &ProductDetails) -> Result<(), CatalogError> {
        let valid = details.validate()?;

        let mut inner = self.inner.write().await;
        let product = inner.products.get_mut(id).ok_or(CatalogError::NotFound)?;
        product.name = valid.name;
        product.kind = valid.kind;
        product.inventory = valid.inventory;

        debug!(id, "Replaced product fields");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.products.len()
    }
}
