use std::{fmt, str::FromStr};

use num::Float;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::TrendError,
    utils::sparse::SpVec,
    vectorizer::{corpus::DocId, term::DocumentTermMatrix},
};

/// Term-frequency scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TfScheme {
    /// raw occurrence count
    #[default]
    Raw,
    /// 1 when the term occurs at all
    Boolean,
    /// 1 + ln(count)
    Log,
}

/// Inverse-document-frequency scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdfScheme {
    /// ln((1 + N) / (1 + df)) + 1
    #[default]
    Smooth,
    /// ln(N / df) + 1
    Plain,
    /// constant 1, i.e. plain term frequency
    Unary,
}

impl TfScheme {
    #[inline]
    pub fn apply(self, count: u32) -> f64 {
        if count == 0 {
            return 0.0;
        }
        match self {
            TfScheme::Raw => count as f64,
            TfScheme::Boolean => 1.0,
            TfScheme::Log => 1.0 + (count as f64).ln(),
        }
    }
}

impl IdfScheme {
    /// `doc_freq` is at least 1 for every vocabulary term
    #[inline]
    pub fn apply(self, doc_num: usize, doc_freq: u32) -> f64 {
        let n = doc_num as f64;
        let df = doc_freq as f64;
        match self {
            IdfScheme::Smooth => ((1.0 + n) / (1.0 + df)).ln() + 1.0,
            IdfScheme::Plain => (n / df.max(1.0)).ln() + 1.0,
            IdfScheme::Unary => 1.0,
        }
    }
}

impl FromStr for TfScheme {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" | "count" => Ok(TfScheme::Raw),
            "boolean" | "binary" => Ok(TfScheme::Boolean),
            "log" => Ok(TfScheme::Log),
            other => Err(TrendError::invalid_argument(format!("unknown tf scheme `{other}`"))),
        }
    }
}

impl FromStr for IdfScheme {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smooth" => Ok(IdfScheme::Smooth),
            "plain" => Ok(IdfScheme::Plain),
            "unary" | "none" => Ok(IdfScheme::Unary),
            other => Err(TrendError::invalid_argument(format!("unknown idf scheme `{other}`"))),
        }
    }
}

impl fmt::Display for TfScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TfScheme::Raw => "raw",
            TfScheme::Boolean => "boolean",
            TfScheme::Log => "log",
        })
    }
}

impl fmt::Display for IdfScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdfScheme::Smooth => "smooth",
            IdfScheme::Plain => "plain",
            IdfScheme::Unary => "unary",
        })
    }
}

/// TF-IDF weighted matrix, same shape as the count matrix it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfMatrix<N = f64>
where
    N: Float,
{
    rows: Vec<SpVec<N>>,
    doc_ids: Vec<DocId>,
    col_num: usize,
    /// idf per column
    idf_vec: Vec<f64>,
    /// document frequency per column
    doc_freq: Vec<u32>,
}

impl<N> TfIdfMatrix<N>
where
    N: Float,
{
    #[inline]
    pub fn row_num(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn col_num(&self) -> usize {
        self.col_num
    }

    #[inline]
    pub fn rows(&self) -> &[SpVec<N>] {
        &self.rows
    }

    #[inline]
    pub fn doc_ids(&self) -> &[DocId] {
        &self.doc_ids
    }

    #[inline]
    pub fn idf_vec(&self) -> &[f64] {
        &self.idf_vec
    }

    #[inline]
    pub fn doc_freq(&self) -> &[u32] {
        &self.doc_freq
    }

    /// Weight at (row, col); zero for absent terms
    pub fn weight(&self, row: usize, col: usize) -> N {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or_else(N::zero)
    }
}

/// TF-IDF calculation engine.
/// Supplies the tf and idf functions; the weighting itself is shared.
pub trait TfIdfEngine {
    /// term-frequency weight of a raw count
    fn tf(&self, count: u32) -> f64;

    /// inverse-document-frequency weight of a term
    /// # Arguments
    /// * `doc_num` - number of rows in the matrix
    /// * `doc_freq` - number of rows containing the term
    fn idf(&self, doc_num: usize, doc_freq: u32) -> f64;

    /// IDF vector over all columns
    fn idf_vec(&self, doc_freq: &[u32], doc_num: usize) -> Vec<f64> {
        doc_freq.iter().map(|&df| self.idf(doc_num, df)).collect()
    }

    /// Weight a count matrix.
    /// Only stored cells are visited, so an absent term stays zero.
    fn weight<N>(&self, matrix: &DocumentTermMatrix) -> TfIdfMatrix<N>
    where
        N: Float,
    {
        let doc_num = matrix.row_num();
        let doc_freq = matrix.document_frequencies();
        let idf_vec = self.idf_vec(&doc_freq, doc_num);

        let rows: Vec<SpVec<N>> = matrix
            .rows()
            .iter()
            .map(|row| {
                let mut weighted = row.map_values(|col, count| cast::<N>(self.tf(count) * idf_vec[col]));
                weighted.shrink_to_fit();
                weighted
            })
            .collect();

        debug!(rows = rows.len(), columns = matrix.col_num(), "weighted tf-idf matrix");

        TfIdfMatrix {
            rows,
            doc_ids: matrix.doc_ids().to_vec(),
            col_num: matrix.col_num(),
            idf_vec,
            doc_freq,
        }
    }
}

#[inline]
fn cast<N: Float>(v: f64) -> N {
    N::from(v).unwrap_or_else(N::max_value)
}

/// Default engine: a tf scheme combined with an idf scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weighting {
    pub tf: TfScheme,
    pub idf: IdfScheme,
}

impl Weighting {
    pub fn new(tf: TfScheme, idf: IdfScheme) -> Self {
        Self { tf, idf }
    }
}

impl TfIdfEngine for Weighting {
    #[inline]
    fn tf(&self, count: u32) -> f64 {
        self.tf.apply(count)
    }

    #[inline]
    fn idf(&self, doc_num: usize, doc_freq: u32) -> f64 {
        self.idf.apply(doc_num, doc_freq)
    }
}
