use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Every field-level problem found in one request body.
#[derive(Clone, Debug, Default, Error, PartialEq, Eq)]
#[error("{}", join_messages(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub fn push(&mut self, error: FieldError) {
        self.fields.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.fields.iter().find(|error| error.field == field).map(|error| error.message)
    }
}

fn join_messages(fields: &[FieldError]) -> String {
    if fields.is_empty() {
        return "invalid product".to_string();
    }
    fields.iter().map(|error| error.message).collect::<Vec<_>>().join("; ")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    MalformedIdentifier,
    NotFound,
    Backend,
}

impl ErrorKind {
    pub fn http_status(self) -> u16 {
        match self {
            Self::Validation | Self::MalformedIdentifier => 400,
            Self::NotFound => 404,
            Self::Backend => 500,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("invalid product: {0}")]
    Validation(#[from] ValidationError),
    #[error("malformed product id `{0}`")]
    MalformedId(String),
    #[error("product `{0}` not found")]
    NotFound(ProductId),
    #[error("persistence failure: {0}")]
    Backend(String),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::MalformedId(_) => ErrorKind::MalformedIdentifier,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Backend(_) => ErrorKind::Backend,
        }
    }

    /// Message safe to hand back to a caller. Backend detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(error) => format!("Invalid product: {error}"),
            Self::MalformedId(_) => "Invalid Product ID".to_string(),
            Self::NotFound(_) => "Product not found".to_string(),
            Self::Backend(_) => "Server error".to_string(),
        }
    }
}
