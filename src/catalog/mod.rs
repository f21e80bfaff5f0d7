//! Product and style tag catalogs
//!
//! Both tables are built once at startup and never mutated. Product lookups
//! that miss are surfaced to callers; tag lookups that miss are ignored by
//! the prompt builder.

mod products;
mod tags;

use std::path::Path;

pub use products::{Product, ProductCatalog};
pub use tags::TagCatalog;

/// Everything a generation request resolves against
#[derive(Debug, Clone)]
pub struct Catalog {
    pub products: ProductCatalog,
    pub tags: TagCatalog,
}

impl Catalog {
    /// Built-in catalog with reference images resolved under `assets_dir`
    pub fn builtin(assets_dir: &Path) -> Self {
        Self {
            products: ProductCatalog::builtin(assets_dir),
            tags: TagCatalog::builtin(),
        }
    }
}
