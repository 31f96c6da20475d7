pub mod catalog;
pub mod recommendation;

pub use catalog::{Catalog, CatalogError, CatalogProvider, SqliteCatalog};
pub use recommendation::RecommendationEngine;
