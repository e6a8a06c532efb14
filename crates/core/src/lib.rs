pub mod catalog;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod errors;

pub use catalog::{CatalogQuery, CatalogStats, CategoryFilter, Layout, SortOrder};
pub use domain::product::{
    NewProduct, Price, PriceInput, Product, ProductId, ProductInput, ProductPatch,
};
pub use envelope::Envelope;
pub use errors::{CatalogError, ErrorKind, FieldError, ValidationError};
