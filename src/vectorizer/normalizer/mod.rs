use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

use crate::{error::{Result, TrendError}, vectorizer::corpus::Document};

/// Typographic marks that are removed like ASCII punctuation.
pub const DELETED_MARKS: &[char] = &[
    '‘', '’', '‚', '‛', '“', '”', '„', '‟', '«', '»', '‹', '›', '¡', '¿', '′', '″',
];

/// Marks that separate words. They are replaced by a space instead of being
/// deleted, so "cats—dogs" yields two tokens.
pub const SEPARATOR_MARKS: &[char] = &['–', '—', '―', '…', '•', '·'];

/// Normalized word unit.
/// Always lowercase, non-empty, free of whitespace and punctuation and not a stopword.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(Box<str>);

impl Token {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What happens to a character during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Keep,
    Delete,
    Separate,
}

#[inline]
fn classify(c: char) -> CharClass {
    if c.is_ascii_punctuation() || DELETED_MARKS.contains(&c) {
        CharClass::Delete
    } else if c.is_whitespace() || SEPARATOR_MARKS.contains(&c) {
        CharClass::Separate
    } else {
        CharClass::Keep
    }
}

/// Lowercase `text`, delete punctuation and turn separator marks into spaces.
fn fold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match classify(c) {
            CharClass::Keep => out.extend(c.to_lowercase()),
            CharClass::Delete => {}
            CharClass::Separate => out.push(' '),
        }
    }
    out
}

/// Per-document text normalizer.
/// Holds the stopword set; it carries no other state, so one instance can be
/// shared by reference across independent runs.
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: HashSet<Box<str>>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Normalizer {
    /// Normalizer with the NLTK English stopword list.
    /// Entries are folded like document text, so "don't" is stored as "dont".
    pub fn english() -> Self {
        let mut normalizer = Self { stopwords: HashSet::new() };
        normalizer.extend_stopwords(get(LANGUAGE::English));
        normalizer
    }

    /// Normalizer with the English list extended by `extra`.
    /// Extra words go through the same folding as document text, so
    /// "Reuters" and "U.S." match tokens "reuters" and "us".
    pub fn with_extra_stopwords<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalizer = Self::english();
        normalizer.extend_stopwords(extra);
        normalizer
    }

    fn extend_stopwords<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            for piece in fold(word.as_ref()).split_whitespace() {
                self.stopwords.insert(Box::from(piece));
            }
        }
    }

    #[inline]
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Normalize a single text into tokens.
    /// Never fails: empty or punctuation-only text yields no tokens.
    pub fn normalize(&self, text: &str) -> Vec<Token> {
        fold(text)
            .split_whitespace()
            .filter(|piece| !self.is_stopword(piece))
            .map(|piece| Token(Box::from(piece)))
            .collect()
    }

    /// Normalize a document, rejecting one whose text is missing.
    pub fn normalize_document(&self, doc: &Document) -> Result<Vec<Token>> {
        match doc.text() {
            Some(text) => Ok(self.normalize(text)),
            None => Err(TrendError::InvalidInput {
                doc_id: doc.id,
                reason: "document text is missing".to_string(),
            }),
        }
    }
}
