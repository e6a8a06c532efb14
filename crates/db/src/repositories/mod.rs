use async_trait::async_trait;
use thiserror::Error;

use storefront_core::domain::product::{Product, ProductId};

pub mod memory;
pub mod product;

pub use memory::InMemoryProductRepository;
pub use product::SqlProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Storage port for product records. Listing returns insertion order.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;
    async fn insert(&self, product: Product) -> Result<(), RepositoryError>;
    /// Returns `false` when no record with `product.id` exists.
    async fn update(&self, product: Product) -> Result<bool, RepositoryError>;
    /// Returns `false` when no record with `id` exists.
    async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError>;
}
