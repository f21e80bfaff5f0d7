//! Product catalog: case id -> prompt description + reference image

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

/// A product that can be rendered into a scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique identifier (case-sensitive)
    pub id: String,
    /// Description used verbatim in the prompt
    pub description: String,
    /// Reference image sent alongside the prompt
    pub image_path: PathBuf,
}

impl Product {
    pub fn new(id: &str, description: &str, image_path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            image_path: image_path.into(),
        }
    }
}

/// Registry of available products
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: HashMap<String, Product>,
}

impl ProductCatalog {
    /// Build a catalog from an explicit product list
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|product| (product.id.clone(), product))
                .collect(),
        }
    }

    /// Built-in PC case line-up
    pub fn builtin(assets_dir: &Path) -> Self {
        Self::new([
            Product::new(
                "white_case",
                "a modern white PC case with a glass side panel",
                assets_dir.join("AP202_PBA_WHITE.png"),
            ),
            Product::new(
                "black_case",
                "a minimalist black PC case with a vertical slatted front panel",
                assets_dir.join("pa401.png"),
            ),
        ])
    }

    /// Exact-key lookup
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    /// All product ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.products.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Warn about products whose reference image is not on disk.
    ///
    /// Returns the number of missing images. Startup continues regardless
    /// since images are read per request.
    pub fn check_assets(&self) -> usize {
        let mut missing = 0;
        for id in self.ids() {
            let product = &self.products[id];
            if !product.image_path.is_file() {
                warn!(
                    "Reference image for '{}' not found at {}",
                    id,
                    product.image_path.display()
                );
                missing += 1;
            }
        }
        missing
    }
}
