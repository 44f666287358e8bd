use std::collections::BTreeMap;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{Result, TrendError},
    utils::sparse::SpVec,
    vectorizer::{corpus::{Corpus, DocId}, normalizer::Normalizer},
};

/// Vocabulary
/// Maps each term to a column index.
/// Indices are contiguous from 0 and follow first-seen order:
/// documents in corpus order, tokens in document order.
///
/// # Examples
/// ```
/// use headline_trends::Vocabulary;
/// let mut vocab = Vocabulary::new();
/// assert_eq!(vocab.insert("cats"), 0);
/// assert_eq!(vocab.insert("chase"), 1);
/// assert_eq!(vocab.insert("cats"), 0);
/// assert_eq!(vocab.term(1), Some("chase"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: IndexSet<Box<str>>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self { terms: IndexSet::new() }
    }

    /// Insert a term and return its column index.
    /// A term already present keeps its original index.
    #[inline]
    pub fn insert(&mut self, term: &str) -> usize {
        match self.terms.get_index_of(term) {
            Some(idx) => idx,
            None => self.terms.insert_full(Box::from(term)).0,
        }
    }

    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    #[inline]
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get_index(index).map(|t| &**t)
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in column order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.terms.iter().map(|t| &**t)
    }
}

/// Sparse document-term count matrix.
/// Rows are accepted documents in corpus order, columns are vocabulary indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTermMatrix {
    rows: Vec<SpVec<u32>>,
    doc_ids: Vec<DocId>,
    col_num: usize,
}

impl DocumentTermMatrix {
    /// Assemble a matrix from rows that all have length `col_num`
    pub fn from_rows(doc_ids: Vec<DocId>, rows: Vec<SpVec<u32>>, col_num: usize) -> Self {
        debug_assert_eq!(doc_ids.len(), rows.len());
        debug_assert!(rows.iter().all(|r| r.len() == col_num));
        Self { rows, doc_ids, col_num }
    }

    #[inline]
    pub fn row_num(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn col_num(&self) -> usize {
        self.col_num
    }

    #[inline]
    pub fn rows(&self) -> &[SpVec<u32>] {
        &self.rows
    }

    #[inline]
    pub fn row(&self, row: usize) -> Option<&SpVec<u32>> {
        self.rows.get(row)
    }

    /// Corpus position of the document behind `row`
    #[inline]
    pub fn doc_id(&self, row: usize) -> Option<DocId> {
        self.doc_ids.get(row).copied()
    }

    #[inline]
    pub fn doc_ids(&self) -> &[DocId] {
        &self.doc_ids
    }

    /// Raw count at (row, col); zero for absent terms
    pub fn count(&self, row: usize, col: usize) -> u32 {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(0)
    }

    /// Number of rows with at least one occurrence of each column's term
    pub fn document_frequencies(&self) -> Vec<u32> {
        let mut df = vec![0u32; self.col_num];
        for row in &self.rows {
            for (col, _) in row.raw_iter() {
                df[col] += 1;
            }
        }
        df
    }

    /// Total stored entries
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(SpVec::nnz).sum()
    }
}

/// A document left out of the matrix, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    pub doc_id: DocId,
    pub reason: String,
}

/// Corpus-level account of how the input documents were used
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// documents handed to the builder
    pub input_docs: usize,
    /// documents that became matrix rows
    pub accepted_docs: usize,
    /// accepted documents that normalized to zero tokens
    pub empty_docs: usize,
    pub excluded: Vec<Exclusion>,
}

impl BuildReport {
    #[inline]
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }
}

/// Result of a vocabulary build
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub vocabulary: Vocabulary,
    pub matrix: DocumentTermMatrix,
    pub report: BuildReport,
}

/// Matrix columns are stored as `u32`
fn column_index(index: usize) -> Result<u32> {
    u32::try_from(index).map_err(|_| {
        TrendError::invalid_argument(format!("vocabulary exceeds {} terms", u32::MAX as u64 + 1))
    })
}

/// Builds the vocabulary and count matrix of a corpus
#[derive(Debug, Clone, Copy)]
pub struct VocabularyBuilder<'a> {
    normalizer: &'a Normalizer,
}

impl<'a> VocabularyBuilder<'a> {
    pub fn new(normalizer: &'a Normalizer) -> Self {
        Self { normalizer }
    }

    /// Normalize every document once and count its terms.
    ///
    /// Documents that fail normalization are excluded and listed in the
    /// report; documents with no tokens keep an all-zero row.
    ///
    /// # Errors
    /// `EmptyCorpus` when the corpus has no documents or none survives
    /// normalization.
    pub fn build(&self, corpus: &Corpus) -> Result<BuildOutput> {
        if corpus.is_empty() {
            return Err(TrendError::EmptyCorpus("no documents supplied"));
        }

        let mut vocabulary = Vocabulary::new();
        let mut counts: Vec<(DocId, BTreeMap<u32, u32>)> = Vec::with_capacity(corpus.doc_num());
        let mut report = BuildReport {
            input_docs: corpus.doc_num(),
            ..BuildReport::default()
        };

        for doc in corpus {
            let tokens = match self.normalizer.normalize_document(doc) {
                Ok(tokens) => tokens,
                Err(err) => {
                    warn!(doc_id = doc.id, error = %err, "excluding document");
                    report.excluded.push(Exclusion {
                        doc_id: doc.id,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };
            if tokens.is_empty() {
                report.empty_docs += 1;
            }
            let mut row = BTreeMap::new();
            for token in &tokens {
                let col = column_index(vocabulary.insert(token.as_str()))?;
                *row.entry(col).or_insert(0u32) += 1;
            }
            counts.push((doc.id, row));
        }

        if counts.is_empty() {
            return Err(TrendError::EmptyCorpus("every document was excluded"));
        }
        report.accepted_docs = counts.len();

        // columns are final only now, so rows take their length here
        let col_num = vocabulary.len();
        let (doc_ids, rows): (Vec<DocId>, Vec<SpVec<u32>>) = counts
            .into_iter()
            .map(|(id, row)| (id, SpVec::from_sorted_pairs(col_num, row)))
            .unzip();
        let matrix = DocumentTermMatrix::from_rows(doc_ids, rows, col_num);

        debug!(
            rows = matrix.row_num(),
            vocabulary = col_num,
            nnz = matrix.nnz(),
            excluded = report.excluded_count(),
            "built document-term matrix"
        );

        Ok(BuildOutput { vocabulary, matrix, report })
    }
}
