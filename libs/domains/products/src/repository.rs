use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::filter::{ProductFilter, ProductQuery};
use crate::models::{CreateProduct, Product, UpdateProduct};

/// Repository trait for Product persistence
///
/// Listing is ordered by id, newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product and return it with its generated id
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// One page of products matching the query filter
    async fn list(&self, query: &ProductQuery) -> ProductResult<Vec<Product>>;

    /// Count products matching a filter
    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64>;

    /// Overwrite an existing product, `NotFound` if there is none
    async fn update(&self, id: i32, input: UpdateProduct) -> ProductResult<Product>;

    /// Delete a product by ID, reporting whether a row was removed
    async fn delete(&self, id: i32) -> ProductResult<bool>;
}

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<i32, Product>,
}

/// Process-local repository, used by the handler tests and for running
/// without a database.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    table: RwLock<Table>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let mut table = self.table.write().await;
        table.last_id = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| ProductError::Internal("product id sequence exhausted".to_string()))?;

        let product = Product::new(table.last_id, input);
        table.rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list(&self, query: &ProductQuery) -> ProductResult<Vec<Product>> {
        let table = self.table.read().await;
        let skip = usize::try_from(query.pagination.skip()).unwrap_or(usize::MAX);
        let take = usize::try_from(query.pagination.take()).unwrap_or(usize::MAX);

        Ok(table
            .rows
            .values()
            .rev()
            .filter(|p| query.filter.matches(p))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64> {
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn update(&self, id: i32, input: UpdateProduct) -> ProductResult<Product> {
        let mut table = self.table.write().await;
        let product = table.rows.get_mut(&id).ok_or(ProductError::NotFound(id))?;
        product.apply_update(input);
        Ok(product.clone())
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}
