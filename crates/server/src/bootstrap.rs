use std::sync::Arc;

use storefront_core::config::{AppConfig, ConfigError, LoadOptions};
use storefront_db::repositories::SqlProductRepository;
use storefront_db::{connect_with_settings, migrations, CatalogStore, DbPool};
use tera::Tera;
use thiserror::Error;
use tracing::info;

use crate::storefront;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub store: CatalogStore,
    pub templates: Arc<Tera>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("storefront templates failed to load: {0}")]
    Templates(#[source] tera::Error),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

/// Opens the pool once for the whole process, applies migrations and wires the store.
pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let templates = storefront::init_templates().map_err(BootstrapError::Templates)?;
    let store = CatalogStore::new(Arc::new(SqlProductRepository::new(db_pool.clone())));

    Ok(Application { config, db_pool, store, templates })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use storefront_core::config::{ConfigOverrides, LoadOptions};
    use storefront_core::domain::product::{PriceInput, ProductInput};

    use crate::bootstrap::{bootstrap, BootstrapError};

    fn options(database_url: &str) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_rejects_non_sqlite_database_url() {
        let result = bootstrap(options("postgres://localhost/catalog")).await;

        assert!(matches!(result, Err(BootstrapError::Config(_))));
        let message = result.err().expect("error").to_string();
        assert!(message.contains("database.url"));
    }

    #[tokio::test]
    async fn bootstrap_migrates_and_wires_the_store() {
        let dir = TempDir::new().expect("tempdir");
        let url = format!("sqlite://{}", dir.path().join("storefront.db").display());
        let app = bootstrap(options(&url))
            .await
            .expect("bootstrap should succeed");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'product'",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("product table should exist after bootstrap");
        assert_eq!(table_count, 1);

        let created = app
            .store
            .create(ProductInput {
                name: Some("Widget".to_string()),
                price: Some(PriceInput::Number(9.99)),
                image: Some("http://x/y.png".to_string()),
                category: None,
            })
            .await
            .expect("create through bootstrapped store");
        assert!(app.store.list().await.expect("list").contains(&created));

        app.db_pool.close().await;
    }
}
