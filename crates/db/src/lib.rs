pub mod catalog;
pub mod connection;
pub mod migrations;
pub mod repositories;

pub use catalog::CatalogStore;
pub use connection::{connect, connect_with_settings, DbPool};
