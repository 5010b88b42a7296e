use std::sync::Arc;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ValidProduct};
use crate::repository::ProductRepository;

/// Service layer mapping product operations onto the repository
#[derive(Clone)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// All products in insertion order
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.find_all().await
    }

    /// Persist a new product; the store assigns the id
    pub async fn create_product(&self, input: ValidProduct) -> ProductResult<Product> {
        self.repository.save(Product::new(input)).await
    }

    pub async fn get_product(&self, id: i64) -> ProductResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Overwrite name, price and quantity of an existing product. A missing
    /// id is `NotFound`; nothing is created.
    pub async fn update_product(&self, id: i64, input: ValidProduct) -> ProductResult<Product> {
        let mut product = self.get_product(id).await?;
        product.apply(input);
        self.repository.save(product).await
    }

    pub async fn delete_product(&self, id: i64) -> ProductResult<()> {
        let deleted = self.repository.delete_by_id(id).await?;

        if !deleted {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }

    pub async fn count_products(&self) -> ProductResult<u64> {
        self.repository.count().await
    }
}
