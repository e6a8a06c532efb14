use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use storefront_core::config::ClientConfig;
use storefront_core::domain::product::{Product, ProductId, ProductInput};
use storefront_core::envelope::Envelope;

use crate::error::ClientError;

/// Remote catalog operations as seen from the client.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ClientError>;
    async fn create(&self, input: &ProductInput) -> Result<Product, ClientError>;
    async fn update(&self, id: &ProductId, input: &ProductInput) -> Result<Product, ClientError>;
    /// Returns the service's confirmation message.
    async fn delete(&self, id: &ProductId) -> Result<String, ClientError>;
}

#[derive(Clone)]
pub struct HttpCatalogApi {
    http: Client,
    base_url: String,
}

impl HttpCatalogApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    fn products_url(&self) -> String {
        format!("{}/api/products", self.base_url)
    }

    fn product_url(&self, id: &ProductId) -> String {
        format!("{}/api/products/{id}", self.base_url)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn list(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.http.get(self.products_url()).send().await?;
        let products: Vec<Product> = expect_data(read_envelope(response).await?)?;
        debug!(event_name = "client.catalog.listed", count = products.len(), "catalog fetched");
        Ok(products)
    }

    async fn create(&self, input: &ProductInput) -> Result<Product, ClientError> {
        let response = self.http.post(self.products_url()).json(input).send().await?;
        expect_data(read_envelope(response).await?)
    }

    async fn update(&self, id: &ProductId, input: &ProductInput) -> Result<Product, ClientError> {
        let response = self.http.put(self.product_url(id)).json(input).send().await?;
        expect_data(read_envelope(response).await?)
    }

    async fn delete(&self, id: &ProductId) -> Result<String, ClientError> {
        let response = self.http.delete(self.product_url(id)).send().await?;
        let envelope: Envelope<serde_json::Value> = read_envelope(response).await?;
        Ok(envelope.message.unwrap_or_else(|| "Product deleted".to_string()))
    }
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>, ClientError> {
    let status = response.status();
    let fallback = status.canonical_reason().unwrap_or("request failed").to_string();

    let envelope = match response.json::<Envelope<T>>().await {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(ClientError::Api { status: status.as_u16(), message: fallback });
        }
        Err(error) => return Err(ClientError::Protocol(error.to_string())),
    };

    if !status.is_success() || !envelope.success {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: envelope.message.unwrap_or(fallback),
        });
    }
    Ok(envelope)
}

fn expect_data<T>(envelope: Envelope<T>) -> Result<T, ClientError> {
    envelope
        .into_data()
        .ok_or_else(|| ClientError::Protocol("success envelope without data".to_string()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use storefront_core::domain::product::ProductId;

    use super::HttpCatalogApi;

    #[test]
    fn urls_ignore_trailing_slash() {
        let api = HttpCatalogApi::new("http://127.0.0.1:8080/", Duration::from_secs(5))
            .expect("client");
        let id = ProductId::new();

        assert_eq!(api.products_url(), "http://127.0.0.1:8080/api/products");
        assert_eq!(api.product_url(&id), format!("http://127.0.0.1:8080/api/products/{id}"));
    }
}
