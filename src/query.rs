//! Builds the shopping search URL whose response page is fed to the extractor.
//! Fetching is left to the caller.

use crate::error::{ExtractError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

// tbm=shop selects shopping results, tbs=vw:l lists them instead of a grid,
// safe=active filters adult content.
const SHOPPING_SEARCH_BASE_URL: &str = "https://www.google.com/search?tbm=shop&tbs=vw:l&safe=active";

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_MAX_RESULTS: u32 = 60;

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static RE_SPECIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[-+=,\n._^";:~#></|!*]"#).expect("special character pattern is valid")
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingQueryInput {
    pub shopping_query: String,
    #[serde(default = "default_max_results")]
    pub max_results_number: u32,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl ShoppingQueryInput {
    pub fn new(shopping_query: &str) -> Self {
        Self {
            shopping_query: shopping_query.to_string(),
            max_results_number: DEFAULT_MAX_RESULTS,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_max_results(mut self, max_results_number: u32) -> Self {
        self.max_results_number = max_results_number;
        self
    }
}

/// A query must contain at least one latin letter to be worth searching.
pub fn is_valid_shopping_query(query: &str) -> bool {
    query.chars().any(|c| c.is_ascii_alphabetic())
}

/// Collapse and trim whitespace, encode spaces, then drop characters the
/// search treats as operators.
pub fn polish_shopping_query(query: &str) -> String {
    let collapsed = RE_WHITESPACE.replace_all(query, " ");
    let encoded = collapsed.trim().replace(' ', "%20");
    RE_SPECIAL.replace_all(&encoded, "").into_owned()
}

pub fn build_search_url(input: &ShoppingQueryInput) -> Result<String> {
    if !is_valid_shopping_query(&input.shopping_query) {
        return Err(ExtractError::InvalidQuery(input.shopping_query.clone()));
    }

    let query = polish_shopping_query(&input.shopping_query);
    debug!("Polished query: {}", query);

    Ok(format!(
        "{}&q={}&hl={}&num={}",
        SHOPPING_SEARCH_BASE_URL, query, input.language, input.max_results_number
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_validity() {
        assert!(is_valid_shopping_query("fountain pen"));
        assert!(is_valid_shopping_query("42 x"));

        assert!(!is_valid_shopping_query(""));
        assert!(!is_valid_shopping_query("   "));
        assert!(!is_valid_shopping_query("12345 !!"));
    }

    #[test]
    fn test_polish_query() {
        assert_eq!(polish_shopping_query("  fountain   pen "), "fountain%20pen");
        assert_eq!(polish_shopping_query("nike\tair\nmax"), "nike%20air%20max");
        assert_eq!(polish_shopping_query("t-shirt, blue!"), "tshirt%20blue");
        assert_eq!(polish_shopping_query("a.b_c:d|e*"), "abcde");
    }

    #[test]
    fn test_build_search_url() {
        let input = ShoppingQueryInput::new("Fountain  Pen")
            .with_language("ro")
            .with_max_results(10);
        assert_eq!(
            build_search_url(&input).unwrap(),
            "https://www.google.com/search?tbm=shop&tbs=vw:l&safe=active&q=Fountain%20Pen&hl=ro&num=10"
        );
    }

    #[test]
    fn test_build_search_url_rejects_invalid_query() {
        let err = build_search_url(&ShoppingQueryInput::new("123")).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidQuery(q) if q == "123"));
    }

    #[test]
    fn test_input_defaults_from_json() {
        let input: ShoppingQueryInput =
            serde_json::from_str(r#"{"shopping_query": "lamp"}"#).unwrap();
        assert_eq!(input, ShoppingQueryInput::new("lamp"));
    }
}
