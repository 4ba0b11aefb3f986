use crate::error::Result;
use crate::extractor::{ExtractOptions, ProductListExtractor};
use crate::layout::{LayoutSpec, SerpLayout};
use crate::query::{ShoppingQueryInput, DEFAULT_LANGUAGE, DEFAULT_MAX_RESULTS};
use std::env;
use std::str::FromStr;
use tracing::{info, warn};

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub layout_file: Option<String>,
    pub skip_untitled: bool,
    pub max_products: Option<usize>,
    pub language: String,
    pub max_results: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            layout_file: None,
            skip_untitled: false,
            max_products: None,
            language: DEFAULT_LANGUAGE.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl ExtractorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset or unparsable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            layout_file: lookup("SHOPPING_LAYOUT_FILE").filter(|v| !v.trim().is_empty()),
            skip_untitled: lookup("SHOPPING_SKIP_UNTITLED")
                .and_then(|v| parse_flag("SHOPPING_SKIP_UNTITLED", &v))
                .unwrap_or(defaults.skip_untitled),
            max_products: lookup("SHOPPING_MAX_PRODUCTS")
                .and_then(|v| parse_number("SHOPPING_MAX_PRODUCTS", &v)),
            language: lookup("SHOPPING_LANGUAGE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.language),
            max_results: lookup("SHOPPING_MAX_RESULTS")
                .and_then(|v| parse_number("SHOPPING_MAX_RESULTS", &v))
                .unwrap_or(defaults.max_results),
        }
    }

    pub fn layout(&self) -> Result<SerpLayout> {
        match &self.layout_file {
            Some(path) => {
                info!("Loading SERP layout from {}", path);
                SerpLayout::compile(&LayoutSpec::from_json_file(path)?)
            }
            None => Ok(SerpLayout::google_shopping()),
        }
    }

    pub fn extractor(&self) -> Result<ProductListExtractor> {
        Ok(ProductListExtractor::new(
            self.layout()?,
            ExtractOptions {
                skip_untitled: self.skip_untitled,
                max_products: self.max_products,
            },
        ))
    }

    pub fn query_input(&self, query: &str) -> ShoppingQueryInput {
        ShoppingQueryInput::new(query)
            .with_language(&self.language)
            .with_max_results(self.max_results)
    }
}

fn parse_flag(key: &str, value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!("Ignoring {}={:?}: expected a boolean", key, other);
            None
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}={:?}: expected a number", key, value);
            None
        }
    }
}
