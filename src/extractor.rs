use crate::layout::SerpLayout;
use crate::normalizer::{normalize, RawBlock};
use crate::selector::select_blocks;
use crate::types::{Product, ShoppingResult};
use chrono::Utc;
use scraper::Html;
use tracing::{debug, info};

/// Post-extraction filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Drop products whose title came out empty.
    pub skip_untitled: bool,
    /// Return at most this many products.
    pub max_products: Option<usize>,
}

/// Extracts product listings from a shopping results page.
#[derive(Debug, Clone, Default)]
pub struct ProductListExtractor {
    layout: SerpLayout,
    options: ExtractOptions,
}

impl ProductListExtractor {
    pub fn new(layout: SerpLayout, options: ExtractOptions) -> Self {
        Self { layout, options }
    }

    pub fn layout(&self) -> &SerpLayout {
        &self.layout
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract products from a complete results page, in document order.
    ///
    /// Never fails: blocks with missing fields produce products with empty
    /// fields, and a page without product blocks produces an empty list.
    pub fn extract(&self, html: &str) -> Vec<Product> {
        let document = Html::parse_document(html);
        let blocks = select_blocks(&document, &self.layout);

        let mut products = Vec::with_capacity(blocks.len());
        for handle in &blocks {
            if let Some(max) = self.options.max_products {
                if products.len() >= max {
                    debug!("Reached max_products={}, stopping", max);
                    break;
                }
            }

            let product = normalize(RawBlock::capture(handle));
            if self.options.skip_untitled && product.title.is_empty() {
                debug!("Skipping untitled block at position {}", handle.position());
                continue;
            }
            products.push(product);
        }

        info!(
            "Extracted {} products from {} blocks",
            products.len(),
            blocks.len()
        );
        products
    }

    /// Extract products and pair them with the query that produced the page.
    pub fn extract_result(&self, query: &str, html: &str) -> ShoppingResult {
        ShoppingResult {
            query: query.to_string(),
            products: self.extract(html),
            scraped_at: Utc::now().to_rfc3339(),
        }
    }
}
