//! Product catalog operations over a [`ProductRepository`].
//!
//! The store owns validation and existence checks. Identifiers are parsed before any lookup so a
//! malformed id is reported as such rather than as a missing record.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{error, info};

use storefront_core::domain::product::{NewProduct, Product, ProductId, ProductInput, ProductPatch};
use storefront_core::errors::CatalogError;

use crate::repositories::{ProductRepository, RepositoryError};

#[derive(Clone)]
pub struct CatalogStore {
    repository: Arc<dyn ProductRepository>,
}

impl CatalogStore {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        self.repository.list().await.map_err(|e| backend("list", e))
    }

    pub async fn find(&self, raw_id: &str) -> Result<Product, CatalogError> {
        let id = ProductId::parse(raw_id)?;
        self.repository
            .find_by_id(&id)
            .await
            .map_err(|e| backend("find", e))?
            .ok_or(CatalogError::NotFound(id))
    }

    pub async fn create(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let new_product = NewProduct::try_from(input)?;
        let product = Product::create(new_product, now());

        self.repository.insert(product.clone()).await.map_err(|e| backend("create", e))?;

        info!(
            event_name = "catalog.product.created",
            product_id = %product.id,
            name = %product.name,
            "product created"
        );
        Ok(product)
    }

    pub async fn update_by_id(
        &self,
        raw_id: &str,
        input: ProductInput,
    ) -> Result<Product, CatalogError> {
        let id = ProductId::parse(raw_id)?;
        let patch = ProductPatch::try_from(input)?;

        let existing = self
            .repository
            .find_by_id(&id)
            .await
            .map_err(|e| backend("update", e))?
            .ok_or(CatalogError::NotFound(id))?;

        let updated = existing.apply(patch, now());
        let found =
            self.repository.update(updated.clone()).await.map_err(|e| backend("update", e))?;
        if !found {
            return Err(CatalogError::NotFound(id));
        }

        info!(
            event_name = "catalog.product.updated",
            product_id = %updated.id,
            "product updated"
        );
        Ok(updated)
    }

    pub async fn delete_by_id(&self, raw_id: &str) -> Result<(), CatalogError> {
        let id = ProductId::parse(raw_id)?;

        let removed = self.repository.delete(&id).await.map_err(|e| backend("delete", e))?;
        if !removed {
            return Err(CatalogError::NotFound(id));
        }

        info!(event_name = "catalog.product.deleted", product_id = %id, "product deleted");
        Ok(())
    }
}

// Stored timestamps keep microsecond precision.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn backend(operation: &'static str, source: RepositoryError) -> CatalogError {
    error!(
        event_name = "catalog.store.failed",
        operation,
        error = %source,
        "product store operation failed"
    );
    CatalogError::Backend(source.to_string())
}
