// Catalog module: loading, the shared snapshot store and filtering.

pub mod filter;
pub mod loader;
pub mod store;

pub use store::{Catalog, CatalogStore};
