use serde::{Deserialize, Serialize};

/// Position of a document in the corpus handed to the pipeline.
pub type DocId = usize;

/// A single raw document.
/// `text` is `None` when the collaborator could not provide a title
/// (missing field, undecodable bytes). Such documents are rejected by the
/// normalizer and reported, never silently turned into blank rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub text: Option<Box<str>>,
}

impl Document {
    pub fn new(id: DocId, text: impl Into<Box<str>>) -> Self {
        Self { id, text: Some(text.into()) }
    }

    pub fn missing(id: DocId) -> Self {
        Self { id, text: None }
    }

    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Ordered collection of documents processed in one pipeline run.
/// Document ids are the positions in the order given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Create an empty corpus
    pub fn new() -> Self {
        Self { documents: Vec::new() }
    }

    /// Build a corpus from texts that are all present
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|t| Some(t.as_ref().to_owned()))
            .collect()
    }

    /// Append a document; it receives the next position as its id
    pub fn push(&mut self, text: Option<&str>) -> DocId {
        let id = self.documents.len();
        self.documents.push(Document {
            id,
            text: text.map(Box::from),
        });
        id
    }

    #[inline]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }
}

impl FromIterator<Option<String>> for Corpus {
    fn from_iter<T: IntoIterator<Item = Option<String>>>(iter: T) -> Self {
        let documents = iter
            .into_iter()
            .enumerate()
            .map(|(id, text)| Document {
                id,
                text: text.map(String::into_boxed_str),
            })
            .collect();
        Self { documents }
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
