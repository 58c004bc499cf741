use thiserror::Error;

/// Errors that abort an export run.
///
/// Individual property facts that cannot be found are not errors; they come
/// back as empty strings from the extractor.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Login form missing, incomplete, or shown again after submitting
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Transport failure or non-success status
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A page is missing an element every listing is expected to have
    #[error("{url}: expected element `{selector}` not found")]
    Structural { url: String, selector: String },

    #[error("cannot resolve link `{href}` against {base}: {source}")]
    InvalidUrl {
        href: String,
        base: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid pattern `{pattern}`: {reason}")]
    Selector { pattern: String, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
