use std::{cmp::Ordering, fmt, str::FromStr};

use num::Float;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Result, TrendError},
    vectorizer::{term::Vocabulary, tfidf::TfIdfMatrix},
};

/// How a term's weights are averaged into one score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreConvention {
    /// mean over every row, zeros included
    #[default]
    Corpus,
    /// mean over the rows where the term occurs
    Present,
}

impl FromStr for ScoreConvention {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "corpus" => Ok(ScoreConvention::Corpus),
            "present" => Ok(ScoreConvention::Present),
            other => Err(TrendError::invalid_argument(format!("unknown score convention `{other}`"))),
        }
    }
}

impl fmt::Display for ScoreConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreConvention::Corpus => "corpus",
            ScoreConvention::Present => "present",
        })
    }
}

/// One row of the keyword table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedKeyword {
    #[serde(rename = "keyword")]
    pub term: String,
    #[serde(rename = "tfidf")]
    pub score: f64,
}

impl fmt::Display for RankedKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.6}", self.term, self.score)
    }
}

/// Per-column mean weight under `convention`
pub fn column_means<N>(tfidf: &TfIdfMatrix<N>, convention: ScoreConvention) -> Vec<f64>
where
    N: Float,
{
    let mut sums = vec![0.0f64; tfidf.col_num()];
    let mut present = vec![0u32; tfidf.col_num()];
    for row in tfidf.rows() {
        for (col, w) in row.raw_iter() {
            sums[col] += w.to_f64().unwrap_or(0.0);
            present[col] += 1;
        }
    }
    let row_num = tfidf.row_num();
    sums.iter()
        .zip(present.iter())
        .map(|(&sum, &n)| {
            let denom = match convention {
                ScoreConvention::Corpus => row_num,
                ScoreConvention::Present => n as usize,
            };
            if denom == 0 { 0.0 } else { sum / denom as f64 }
        })
        .collect()
}

/// Rank terms by mean weight over the whole corpus.
/// See [`rank_with`].
pub fn rank<N>(tfidf: &TfIdfMatrix<N>, vocabulary: &Vocabulary, top_k: usize) -> Result<Vec<RankedKeyword>>
where
    N: Float,
{
    rank_with(tfidf, vocabulary, top_k, ScoreConvention::Corpus)
}

/// Rank terms by mean weight, highest first.
/// Ties go to the lower vocabulary index, i.e. the term seen first.
/// Returns at most `top_k` entries, fewer when the vocabulary is smaller.
///
/// # Errors
/// `InvalidArgument` when `top_k` is zero or the vocabulary does not match
/// the matrix columns.
pub fn rank_with<N>(
    tfidf: &TfIdfMatrix<N>,
    vocabulary: &Vocabulary,
    top_k: usize,
    convention: ScoreConvention,
) -> Result<Vec<RankedKeyword>>
where
    N: Float,
{
    if top_k == 0 {
        return Err(TrendError::invalid_argument("top_k must be positive"));
    }
    if vocabulary.len() != tfidf.col_num() {
        return Err(TrendError::invalid_argument(format!(
            "vocabulary has {} terms but the matrix has {} columns",
            vocabulary.len(),
            tfidf.col_num()
        )));
    }

    let means = column_means(tfidf, convention);
    let mut order: Vec<(usize, f64)> = means.into_iter().enumerate().collect();
    let by_score = |a: &(usize, f64), b: &(usize, f64)| -> Ordering {
        b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
    };
    if top_k < order.len() {
        order.select_nth_unstable_by(top_k - 1, by_score);
        order.truncate(top_k);
    }
    order.sort_unstable_by(by_score);

    let ranked: Vec<RankedKeyword> = order
        .into_iter()
        .filter_map(|(col, score)| {
            vocabulary.term(col).map(|term| RankedKeyword {
                term: term.to_string(),
                score,
            })
        })
        .collect();

    debug!(top_k, returned = ranked.len(), %convention, "ranked keywords");
    Ok(ranked)
}
