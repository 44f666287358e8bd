use std::io;

/// Errors produced by the trend pipeline and its table glue.
#[derive(thiserror::Error, Debug)]
pub enum TrendError {
    /// A document's text is missing or could not be decoded.
    #[error("invalid input in document {doc_id}: {reason}")]
    InvalidInput { doc_id: usize, reason: String },

    /// No documents were available to build a vocabulary from.
    #[error("empty corpus: {0}")]
    EmptyCorpus(&'static str),

    /// Illegal configuration, e.g. a zero `top_k` or an unknown scheme name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Cbor(#[from] serde_cbor::Error),
}

impl TrendError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        TrendError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TrendError>;
