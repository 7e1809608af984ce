//! Error types shared by the locator, the fetcher and the parsing strategies.

use thiserror::Error;

/// Everything that can abort a parser run.
///
/// Structural failures (`TagNotFound`, `ListNotFound`, `TextNotFound`) mean a page no longer
/// looks the way a strategy expects; they are never retried. `Fetch` and `Request` cover the
/// network side.
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("tag <{tag}> matching {matcher} not found in {context}")]
    TagNotFound {
        context: String,
        tag: String,
        matcher: String,
    },

    #[error("no list containing {marker:?} found")]
    ListNotFound { marker: String },

    #[error("text node {text:?} not found")]
    TextNotFound { text: String },

    #[error("<{tag}> has no `{attribute}` attribute")]
    MissingAttribute { tag: String, attribute: String },

    #[error("unexpected {what}: {value:?}")]
    UnexpectedFormat { what: String, value: String },

    #[error("request to {url} failed with status {status}")]
    Fetch { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("cannot resolve {href:?} against {base}: {source}")]
    InvalidUrl {
        base: String,
        href: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParserError {
    /// True for failures caused by page structure rather than transport or storage.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::TagNotFound { .. }
                | Self::ListNotFound { .. }
                | Self::TextNotFound { .. }
                | Self::MissingAttribute { .. }
                | Self::UnexpectedFormat { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ParserError>;
