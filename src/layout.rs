//! Declarative description of where product fields live inside a results page.
//!
//! A results page has no semantic labels, so every field is addressed by a
//! `(selector, ordinal)` pair relative to its product block. The pairs are
//! kept in one table and compiled once, so the lookup in
//! [`crate::selector`] is uniform for every field.

use crate::error::{ExtractError, Result};
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Class marking each repeating product container on the shopping SERP.
pub const DEFAULT_BLOCK_CLASS: &str = "u30d4";

/// Fields addressable inside a product block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    ImageLink,
    Link,
    Title,
    FirstInfo,
    SecondInfo,
    ThirdInfo,
}

impl FieldName {
    pub const ALL: [FieldName; 6] = [
        FieldName::ImageLink,
        FieldName::Link,
        FieldName::Title,
        FieldName::FirstInfo,
        FieldName::SecondInfo,
        FieldName::ThirdInfo,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::ImageLink => "image_link",
            FieldName::Link => "link",
            FieldName::Title => "title",
            FieldName::FirstInfo => "first_info",
            FieldName::SecondInfo => "second_info",
            FieldName::ThirdInfo => "third_info",
        }
    }
}

/// Position of a field: the `ordinal`-th (1-based) descendant of the block
/// matching `selector`, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldPath {
    pub selector: String,
    #[serde(default = "default_ordinal")]
    pub ordinal: usize,
}

fn default_ordinal() -> usize {
    1
}

impl FieldPath {
    pub fn new(selector: &str, ordinal: usize) -> Self {
        Self {
            selector: selector.to_string(),
            ordinal,
        }
    }
}

/// Serializable form of the field-path table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutSpec {
    pub block_class: String,
    pub image_link: FieldPath,
    pub link: FieldPath,
    pub title: FieldPath,
    pub first_info: FieldPath,
    pub second_info: FieldPath,
    pub third_info: FieldPath,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self {
            block_class: DEFAULT_BLOCK_CLASS.to_string(),
            image_link: FieldPath::new(".oR27Gd > img", 1),
            link: FieldPath::new(".rgHvZc > a", 1),
            title: FieldPath::new(".rgHvZc > a", 1),
            first_info: FieldPath::new(".dD8iuc", 1),
            second_info: FieldPath::new(".dD8iuc", 2),
            third_info: FieldPath::new(".dD8iuc", 3),
        }
    }
}

impl LayoutSpec {
    pub fn path(&self, field: FieldName) -> &FieldPath {
        match field {
            FieldName::ImageLink => &self.image_link,
            FieldName::Link => &self.link,
            FieldName::Title => &self.title,
            FieldName::FirstInfo => &self.first_info,
            FieldName::SecondInfo => &self.second_info,
            FieldName::ThirdInfo => &self.third_info,
        }
    }

    /// Load a layout from a JSON file. Keys left out keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ExtractError::LayoutFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| ExtractError::LayoutFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// A field path with its selector parsed.
#[derive(Debug, Clone)]
pub struct CompiledPath {
    source: String,
    selector: Selector,
    ordinal: usize,
}

impl CompiledPath {
    fn compile(field: FieldName, path: &FieldPath) -> Result<Self> {
        if path.ordinal == 0 {
            return Err(ExtractError::InvalidLayout(format!(
                "ordinal for field '{}' must be 1 or greater",
                field.as_str()
            )));
        }
        Ok(Self {
            source: path.selector.clone(),
            selector: parse_selector(&path.selector)?,
            ordinal: path.ordinal,
        })
    }

    /// Find the node this path points at below `root`, if there is one.
    pub fn locate<'a>(&self, root: ElementRef<'a>) -> Option<ElementRef<'a>> {
        root.select(&self.selector).nth(self.ordinal - 1)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// Compiled field-path table plus the block marker.
#[derive(Debug, Clone)]
pub struct SerpLayout {
    block_class: String,
    block: Selector,
    fields: [CompiledPath; 6],
}

impl SerpLayout {
    pub fn compile(spec: &LayoutSpec) -> Result<Self> {
        let class = spec.block_class.trim();
        let class = class.strip_prefix('.').unwrap_or(class);
        if class.is_empty() || class.chars().any(char::is_whitespace) {
            return Err(ExtractError::InvalidLayout(format!(
                "block class must be a single class name, got {:?}",
                spec.block_class
            )));
        }
        let block = parse_selector(&format!(".{}", class))?;

        let [image_link, link, title, first_info, second_info, third_info] =
            FieldName::ALL.map(|field| CompiledPath::compile(field, spec.path(field)));

        let layout = Self {
            block_class: class.to_string(),
            block,
            fields: [image_link?, link?, title?, first_info?, second_info?, third_info?],
        };
        debug!("Compiled SERP layout with block class '{}'", layout.block_class);
        Ok(layout)
    }

    /// The layout of the shopping results page as currently served.
    pub fn google_shopping() -> Self {
        Self::compile(&LayoutSpec::default())
            .unwrap_or_else(|e| unreachable!("built-in layout failed to compile: {}", e))
    }

    pub fn block_class(&self) -> &str {
        &self.block_class
    }

    pub fn block_selector(&self) -> &Selector {
        &self.block
    }

    pub fn path(&self, field: FieldName) -> &CompiledPath {
        &self.fields[field.index()]
    }
}

impl Default for SerpLayout {
    fn default() -> Self {
        Self::google_shopping()
    }
}

fn parse_selector(source: &str) -> Result<Selector> {
    Selector::parse(source).map_err(|e| ExtractError::InvalidSelector {
        selector: source.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_layout_compiles() {
        let layout = SerpLayout::google_shopping();
        assert_eq!(layout.block_class(), "u30d4");
        assert_eq!(layout.path(FieldName::Title).source(), ".rgHvZc > a");
        assert_eq!(layout.path(FieldName::ThirdInfo).ordinal(), 3);
        assert_eq!(layout.path(FieldName::FirstInfo).source(), ".dD8iuc");
    }

    #[test]
    fn test_zero_ordinal_is_rejected() {
        let mut spec = LayoutSpec::default();
        spec.second_info.ordinal = 0;
        let err = SerpLayout::compile(&spec).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidLayout(_)));
        assert!(err.to_string().contains("second_info"));
    }

    #[test]
    fn test_bad_selector_is_rejected() {
        let mut spec = LayoutSpec::default();
        spec.title.selector = "a[".to_string();
        let err = SerpLayout::compile(&spec).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidSelector { .. }));
    }

    #[test]
    fn test_block_class_must_be_single_class() {
        for class in ["", "  ", "a b"] {
            let spec = LayoutSpec {
                block_class: class.to_string(),
                ..LayoutSpec::default()
            };
            assert!(SerpLayout::compile(&spec).is_err(), "{:?} should be rejected", class);
        }

        let spec = LayoutSpec {
            block_class: ".item".to_string(),
            ..LayoutSpec::default()
        };
        assert_eq!(SerpLayout::compile(&spec).unwrap().block_class(), "item");
    }

    #[test]
    fn test_layout_from_json_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"block_class": "card", "title": {{"selector": "h3 > a"}}}}"#
        )
        .unwrap();

        let spec = LayoutSpec::from_json_file(file.path()).unwrap();
        assert_eq!(spec.block_class, "card");
        assert_eq!(spec.title, FieldPath::new("h3 > a", 1));
        assert_eq!(spec.third_info, LayoutSpec::default().third_info);
    }

    #[test]
    fn test_missing_layout_file() {
        let err = LayoutSpec::from_json_file("/nonexistent/layout.json").unwrap_err();
        assert!(matches!(err, ExtractError::LayoutFile { .. }));
    }
}
