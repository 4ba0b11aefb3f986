pub mod config;
pub mod error;
pub mod extractor;
pub mod layout;
pub mod normalizer;
pub mod query;
pub mod selector;
pub mod types;

pub use config::ExtractorConfig;
pub use error::ExtractError;
pub use extractor::{ExtractOptions, ProductListExtractor};
pub use layout::{LayoutSpec, SerpLayout};
pub use types::*;

/// Extract products from a results page using the built-in layout.
pub fn extract_products(html: &str) -> Vec<Product> {
    ProductListExtractor::default().extract(html)
}
