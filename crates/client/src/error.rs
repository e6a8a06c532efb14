use thiserror::Error;

use storefront_core::domain::product::ProductId;

use crate::form::FormErrors;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a failure envelope or a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response from catalog service: {0}")]
    Protocol(String),
    #[error("{0}")]
    Invalid(FormErrors),
    #[error("product `{0}` is not in the loaded catalog")]
    UnknownProduct(ProductId),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
