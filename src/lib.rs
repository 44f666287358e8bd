//! This crate ranks the most distinctive keywords of a headline corpus using TF-IDF.

pub mod config;
pub mod error;
pub mod table;
pub mod utils;
pub mod vectorizer;

/// Trend Pipeline
/// The top-level struct of this crate.
/// It turns a corpus of raw headline texts into a ranked keyword table by
/// running, in order:
/// - the normalizer (case folding, punctuation and stopword removal)
/// - the vocabulary builder (term columns and the sparse count matrix)
/// - the TF-IDF weighter
/// - the trend ranker (mean weight per term, top-K)
///
/// Every run is self-contained: the pipeline keeps no vocabulary or matrix
/// between runs, so independent corpora can be processed in parallel with
/// `run_many`.
pub use vectorizer::{TrendPipeline, TrendReport};

/// Pipeline configuration
/// `top_k`, tf and idf schemes, the averaging convention and extra stopwords.
/// Loadable from JSON.
pub use config::PipelineConfig;

/// Error type shared by the pipeline and the table glue
pub use error::{Result, TrendError};

/// Corpus and Document
/// A corpus is the ordered collection of documents of one run.
/// A document's id is its position; its text may be missing, in which case
/// the document is excluded from the matrix and reported.
pub use vectorizer::corpus::{Corpus, DocId, Document};

/// Normalizer and Token
/// Lowercases text, strips punctuation and drops English stopwords.
pub use vectorizer::normalizer::{Normalizer, Token};

/// Vocabulary Builder
/// Assigns column indices in first-seen order and counts terms per document.
/// The `BuildReport` lists every excluded document.
pub use vectorizer::term::{BuildOutput, BuildReport, DocumentTermMatrix, Exclusion, Vocabulary, VocabularyBuilder};

/// TF-IDF Weighter
/// `Weighting` combines a `TfScheme` (raw, boolean, log) with an `IdfScheme`
/// (smooth, plain, unary). Custom engines implement `TfIdfEngine`.
pub use vectorizer::tfidf::{IdfScheme, TfIdfEngine, TfIdfMatrix, TfScheme, Weighting};

/// Trend Ranker
/// Scores each term by its mean weight and keeps the top-K, ties broken by
/// first appearance.
pub use vectorizer::rank::{rank, rank_with, RankedKeyword, ScoreConvention};
