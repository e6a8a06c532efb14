pub mod api;
pub mod error;
pub mod form;
pub mod state;

pub use api::{CatalogApi, HttpCatalogApi};
pub use error::ClientError;
pub use form::{FormErrors, ProductForm};
pub use state::{CatalogClient, Confirm, DeleteOutcome, LoadState, View};
