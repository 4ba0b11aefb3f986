//! Locates product blocks in a parsed results page and reads fields out of
//! them through the layout's field-path table.

use crate::layout::{FieldName, SerpLayout};
use scraper::{ElementRef, Html};
use tracing::debug;

/// One product block in a parsed document.
#[derive(Debug, Clone, Copy)]
pub struct BlockHandle<'a> {
    element: ElementRef<'a>,
    layout: &'a SerpLayout,
    position: usize,
}

/// Collect the product blocks of `document`, in document order.
///
/// The last element carrying the block class is always left out: on the
/// results page it is a trailing container that does not describe a product.
pub fn select_blocks<'a>(document: &'a Html, layout: &'a SerpLayout) -> Vec<BlockHandle<'a>> {
    let matched: Vec<ElementRef<'a>> = document.select(layout.block_selector()).collect();
    let keep = matched.len().saturating_sub(1);
    debug!(
        "Found {} '.{}' containers, keeping {}",
        matched.len(),
        layout.block_class(),
        keep
    );

    matched
        .into_iter()
        .take(keep)
        .enumerate()
        .map(|(position, element)| BlockHandle {
            element,
            layout,
            position,
        })
        .collect()
}

impl<'a> BlockHandle<'a> {
    /// Zero-based position of this block among the kept blocks.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn root(&self) -> ElementRef<'a> {
        self.element
    }

    /// The node a field resolves to, or `None` when the block lacks it.
    pub fn element(&self, field: FieldName) -> Option<ElementRef<'a>> {
        self.layout.path(field).locate(self.element)
    }

    pub fn attr(&self, field: FieldName, name: &str) -> Option<String> {
        self.element(field)
            .and_then(|el| el.value().attr(name).map(str::to_string))
    }

    /// Inner markup of the field's node, trimmed.
    pub fn markup(&self, field: FieldName) -> Option<String> {
        self.element(field).map(|el| el.inner_html().trim().to_string())
    }

    /// Text content of the field's node with whitespace collapsed.
    pub fn text(&self, field: FieldName) -> Option<String> {
        self.element(field).map(|el| collapse_whitespace(el.text()))
    }
}

fn collapse_whitespace<'t>(parts: impl Iterator<Item = &'t str>) -> String {
    let mut out = String::new();
    for word in parts.flat_map(str::split_whitespace) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
