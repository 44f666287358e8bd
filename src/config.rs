use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, TrendError},
    vectorizer::{rank::ScoreConvention, tfidf::{IdfScheme, TfScheme}},
};

pub const DEFAULT_TOP_K: i64 = 10;

/// Pipeline configuration.
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "top_k": 25, "tf_scheme": "log", "extra_stopwords": ["reuters"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    /// number of keywords to keep; must be positive
    pub top_k: i64,
    pub tf_scheme: TfScheme,
    pub idf_scheme: IdfScheme,
    pub score_convention: ScoreConvention,
    /// added to the built-in English stopwords
    pub extra_stopwords: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            tf_scheme: TfScheme::default(),
            idf_scheme: IdfScheme::default(),
            score_convention: ScoreConvention::default(),
            extra_stopwords: Vec::new(),
        }
    }
}

/// On-disk shape; scheme names stay strings until validated
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    top_k: Option<i64>,
    tf_scheme: Option<String>,
    idf_scheme: Option<String>,
    score_convention: Option<String>,
    extra_stopwords: Vec<String>,
}

impl TryFrom<RawConfig> for PipelineConfig {
    type Error = TrendError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        let defaults = PipelineConfig::default();
        Ok(Self {
            top_k: raw.top_k.unwrap_or(defaults.top_k),
            tf_scheme: raw
                .tf_scheme
                .as_deref()
                .map(str::parse::<TfScheme>)
                .transpose()?
                .unwrap_or(defaults.tf_scheme),
            idf_scheme: raw
                .idf_scheme
                .as_deref()
                .map(str::parse::<IdfScheme>)
                .transpose()?
                .unwrap_or(defaults.idf_scheme),
            score_convention: raw
                .score_convention
                .as_deref()
                .map(str::parse::<ScoreConvention>)
                .transpose()?
                .unwrap_or(defaults.score_convention),
            extra_stopwords: raw.extra_stopwords,
        })
    }
}

impl PipelineConfig {
    /// Load from a JSON file and validate
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(raw)?;
        let config = PipelineConfig::try_from(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// `top_k` as a count, rejecting zero and negative values
    pub fn top_k(&self) -> Result<usize> {
        if self.top_k <= 0 {
            return Err(TrendError::invalid_argument(format!(
                "top_k must be positive, got {}",
                self.top_k
            )));
        }
        usize::try_from(self.top_k)
            .map_err(|_| TrendError::invalid_argument(format!("top_k {} is too large", self.top_k)))
    }

    pub fn validate(&self) -> Result<()> {
        self.top_k().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.top_k().unwrap(), 10);
        assert_eq!(config.tf_scheme, TfScheme::Raw);
        assert_eq!(config.idf_scheme, IdfScheme::Smooth);
        assert_eq!(config.score_convention, ScoreConvention::Corpus);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json_str(r#"{ "top_k": 3, "tf_scheme": "log" }"#).unwrap();
        assert_eq!(config.top_k().unwrap(), 3);
        assert_eq!(config.tf_scheme, TfScheme::Log);
        assert_eq!(config.idf_scheme, IdfScheme::Smooth);
    }

    #[test]
    fn non_positive_top_k_is_rejected() {
        for raw in [r#"{ "top_k": 0 }"#, r#"{ "top_k": -4 }"#] {
            let err = PipelineConfig::from_json_str(raw).unwrap_err();
            assert!(matches!(err, TrendError::InvalidArgument(_)), "{raw}");
        }
    }

    #[test]
    fn unknown_scheme_is_an_invalid_argument() {
        let err = PipelineConfig::from_json_str(r#"{ "idf_scheme": "bm25" }"#).unwrap_err();
        assert!(matches!(err, TrendError::InvalidArgument(_)));
        let err = PipelineConfig::from_json_str(r#"{ "score_convention": "median" }"#).unwrap_err();
        assert!(matches!(err, TrendError::InvalidArgument(_)));
    }

    #[test]
    fn unknown_keys_are_a_parse_error() {
        let err = PipelineConfig::from_json_str(r#"{ "topk": 5 }"#).unwrap_err();
        assert!(matches!(err, TrendError::Json(_)));
    }
}
