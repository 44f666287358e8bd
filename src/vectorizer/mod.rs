pub mod corpus;
pub mod normalizer;
pub mod rank;
pub mod term;
pub mod tfidf;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::PipelineConfig,
    error::Result,
    vectorizer::{
        corpus::Corpus,
        normalizer::Normalizer,
        rank::{rank_with, RankedKeyword, ScoreConvention},
        term::{BuildOutput, BuildReport, VocabularyBuilder},
        tfidf::{TfIdfEngine, TfIdfMatrix, Weighting},
    },
};

/// Keyword trend pipeline.
/// Runs normalizer, vocabulary builder, weighter and ranker in sequence.
/// Holds only its configuration; every run allocates its own vocabulary and
/// matrices, so one pipeline can serve many corpora concurrently.
#[derive(Debug, Clone)]
pub struct TrendPipeline {
    normalizer: Normalizer,
    weighting: Weighting,
    convention: ScoreConvention,
    top_k: usize,
}

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// ranked keyword table, highest score first
    pub keywords: Vec<RankedKeyword>,
    pub vocabulary_size: usize,
    pub build: BuildReport,
}

impl TrendReport {
    #[inline]
    pub fn excluded_count(&self) -> usize {
        self.build.excluded_count()
    }
}

impl TrendPipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let top_k = config.top_k()?;
        Ok(Self {
            normalizer: Normalizer::with_extra_stopwords(&config.extra_stopwords),
            weighting: Weighting::new(config.tf_scheme, config.idf_scheme),
            convention: config.score_convention,
            top_k,
        })
    }

    #[inline]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Run every stage over `corpus`
    pub fn run(&self, corpus: &Corpus) -> Result<TrendReport> {
        let BuildOutput { vocabulary, matrix, report } =
            VocabularyBuilder::new(&self.normalizer).build(corpus)?;
        let tfidf: TfIdfMatrix<f64> = self.weighting.weight(&matrix);
        drop(matrix);
        let keywords = rank_with(&tfidf, &vocabulary, self.top_k, self.convention)?;

        info!(
            documents = report.input_docs,
            excluded = report.excluded_count(),
            vocabulary = vocabulary.len(),
            keywords = keywords.len(),
            tf = %self.weighting.tf,
            idf = %self.weighting.idf,
            top_keyword = keywords.first().map(|k| k.term.as_str()).unwrap_or(""),
            "ranked corpus keywords"
        );

        Ok(TrendReport {
            keywords,
            vocabulary_size: vocabulary.len(),
            build: report,
        })
    }

    /// Run over plain texts, all present
    pub fn run_texts<I, S>(&self, texts: I) -> Result<TrendReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.run(&Corpus::from_texts(texts))
    }

    /// Run independent corpora in parallel.
    /// Results keep the order of `corpora`; one failing corpus does not affect the others.
    pub fn run_many(&self, corpora: &[Corpus]) -> Vec<Result<TrendReport>> {
        corpora.par_iter().map(|corpus| self.run(corpus)).collect()
    }
}
