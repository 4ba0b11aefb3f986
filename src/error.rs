use thiserror::Error;

/// Errors surfaced by the extraction library.
///
/// Per-block problems (missing nodes, absent rating) never show up here;
/// they degrade to empty values inside the normalizer.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid shopping query: {0:?}")]
    InvalidQuery(String),

    #[error("failed to load layout file {path}: {reason}")]
    LayoutFile { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
