//! Table glue around the pipeline: loading headline tables into a
//! [`Corpus`] and writing ranked keyword tables back out.
//! Nothing in here is used by the pipeline stages themselves.

use std::{
    borrow::Cow,
    collections::HashSet,
    fmt::{self, Write as _},
    io::{BufRead, Read, Write},
    path::Path,
    str::FromStr,
};

use serde_json::Value;
use tracing::debug;

use crate::{
    error::{Result, TrendError},
    vectorizer::{corpus::Corpus, rank::RankedKeyword},
};

pub const DEFAULT_TITLE_FIELD: &str = "title";

/// Format of an input headline table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// one headline per line
    Lines,
    /// JSON array of strings or of objects carrying a title field
    Json,
}

impl InputFormat {
    /// Guess from the file extension; anything but `.json` is read as lines
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Lines,
        }
    }
}

/// Format of the output keyword table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
    Cbor,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Cbor => "cbor",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "cbor" => Ok(OutputFormat::Cbor),
            other => Err(TrendError::invalid_argument(format!("unknown output format `{other}`"))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Read one headline per line.
/// Lines that are not valid UTF-8 become documents with missing text,
/// so the pipeline reports them instead of guessing their content.
pub fn read_lines<R: BufRead>(reader: R) -> Result<Corpus> {
    let mut corpus = Corpus::new();
    for line in reader.split(b'\n') {
        let mut bytes = line?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        match String::from_utf8(bytes) {
            Ok(text) => corpus.push(Some(text.as_str())),
            Err(_) => corpus.push(None),
        };
    }
    Ok(corpus)
}

/// Read a JSON array of headlines.
/// Elements may be strings, or objects whose `title_field` holds the text.
/// A null, absent or non-string title gives a document with missing text.
pub fn read_json<R: Read>(reader: R, title_field: &str) -> Result<Corpus> {
    let value: Value = serde_json::from_reader(reader)?;
    let Value::Array(rows) = value else {
        return Err(TrendError::invalid_argument("expected a JSON array of headlines"));
    };
    let mut corpus = Corpus::new();
    for row in &rows {
        let text = match row {
            Value::String(text) => Some(text.as_str()),
            Value::Object(fields) => fields.get(title_field).and_then(Value::as_str),
            _ => None,
        };
        corpus.push(text);
    }
    Ok(corpus)
}

/// Concatenate corpora in order, renumbering documents.
/// With `dedup`, a title already seen in an earlier document is skipped;
/// missing titles are always kept so they still get reported.
pub fn merge_corpora<'a, I>(corpora: I, dedup: bool) -> Corpus
where
    I: IntoIterator<Item = &'a Corpus>,
{
    let mut merged = Corpus::new();
    let mut seen: HashSet<&'a str> = HashSet::new();
    let mut skipped = 0usize;
    for corpus in corpora {
        for doc in corpus {
            if let (true, Some(text)) = (dedup, doc.text()) {
                if !seen.insert(text) {
                    skipped += 1;
                    continue;
                }
            }
            merged.push(doc.text());
        }
    }
    debug!(documents = merged.doc_num(), duplicates = skipped, "merged corpora");
    merged
}

/// File names for per-input keyword tables.
/// Each name is prefixed with the input's position, so inputs sharing a
/// stem (`a/news.txt`, `b/news.txt`) never write to the same file.
pub fn keyword_table_names<P: AsRef<Path>>(inputs: &[P], format: OutputFormat) -> Vec<String> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let stem = path
                .as_ref()
                .file_stem()
                .map(|s| s.to_string_lossy())
                .unwrap_or(Cow::Borrowed("corpus"));
            format!("{i}-{stem}.keywords.{}", format.extension())
        })
        .collect()
}

/// Write the keyword table with columns `keyword` and `tfidf`
pub fn write_keywords<W: Write>(mut writer: W, keywords: &[RankedKeyword], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => {
            // keywords never contain commas, quotes or whitespace
            writeln!(writer, "keyword,tfidf")?;
            for k in keywords {
                writeln!(writer, "{},{}", k.term, k.score)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, keywords)?;
            writeln!(writer)?;
        }
        OutputFormat::Cbor => serde_cbor::to_writer(&mut writer, &keywords)?,
    }
    writer.flush()?;
    Ok(())
}

/// Horizontal text bar chart of the ranked keywords
pub fn render_bars(keywords: &[RankedKeyword], width: usize) -> String {
    let mut out = String::new();
    let Some(max) = keywords.iter().map(|k| k.score).reduce(f64::max) else {
        return out;
    };
    let label_width = keywords.iter().map(|k| k.term.chars().count()).max().unwrap_or(0);
    for k in keywords {
        let len = if max > 0.0 {
            ((k.score / max) * width as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(out, "{:<label_width$} {} {:.4}", k.term, "#".repeat(len), k.score);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(term: &str, score: f64) -> RankedKeyword {
        RankedKeyword { term: term.to_string(), score }
    }

    #[test]
    fn lines_keep_blank_lines_and_flag_bad_bytes() {
        let input: &[u8] = b"Cats chase mice\r\n\n\xff\xfe broken\nDogs chase cats\n";
        let corpus = read_lines(input).unwrap();
        let texts: Vec<Option<&str>> = corpus.iter().map(|d| d.text()).collect();
        assert_eq!(texts, vec![Some("Cats chase mice"), Some(""), None, Some("Dogs chase cats")]);
    }

    #[test]
    fn json_reads_strings_and_records() {
        let input = r#"["plain", {"title": "from record"}, {"title": null}, {"summary": "x"}, 3]"#;
        let corpus = read_json(input.as_bytes(), DEFAULT_TITLE_FIELD).unwrap();
        let texts: Vec<Option<&str>> = corpus.iter().map(|d| d.text()).collect();
        assert_eq!(texts, vec![Some("plain"), Some("from record"), None, None, None]);
    }

    #[test]
    fn json_must_be_an_array() {
        let err = read_json(r#"{"title": "x"}"#.as_bytes(), DEFAULT_TITLE_FIELD).unwrap_err();
        assert!(matches!(err, TrendError::InvalidArgument(_)));
    }

    #[test]
    fn merge_renumbers_and_dedups() {
        let a = Corpus::from_texts(["same", "first"]);
        let b: Corpus = vec![Some("same".to_string()), None, None].into_iter().collect();
        let merged = merge_corpora([&a, &b], true);
        let texts: Vec<Option<&str>> = merged.iter().map(|d| d.text()).collect();
        assert_eq!(texts, vec![Some("same"), Some("first"), None, None]);
        assert_eq!(merged.documents()[3].id, 3);
        assert_eq!(merge_corpora([&a, &b], false).doc_num(), 5);
    }

    #[test]
    fn keyword_table_names_are_distinct_for_shared_stems() {
        let inputs = [Path::new("a/news.txt"), Path::new("b/news.txt"), Path::new("..")];
        let names = keyword_table_names(&inputs, OutputFormat::Json);
        assert_eq!(names, vec!["0-news.keywords.json", "1-news.keywords.json", "2-corpus.keywords.json"]);
    }

    #[test]
    fn csv_has_keyword_and_tfidf_columns() {
        let mut out = Vec::new();
        write_keywords(&mut out, &[kw("cats", 1.0), kw("mice", 0.5)], OutputFormat::Csv).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "keyword,tfidf\ncats,1\nmice,0.5\n");
    }

    #[test]
    fn json_uses_table_column_names() {
        let mut out = Vec::new();
        write_keywords(&mut out, &[kw("cats", 1.5)], OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["keyword"], "cats");
        assert_eq!(value[0]["tfidf"], 1.5);
    }

    #[test]
    fn cbor_snapshot_reads_back() {
        let keywords = vec![kw("cats", 1.0), kw("dogs", 0.25)];
        let mut out = Vec::new();
        write_keywords(&mut out, &keywords, OutputFormat::Cbor).unwrap();
        let back: Vec<RankedKeyword> = serde_cbor::from_slice(&out).unwrap();
        assert_eq!(back, keywords);
    }

    #[test]
    fn bars_scale_to_the_top_score() {
        let chart = render_bars(&[kw("cats", 2.0), kw("mice", 1.0)], 10);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], "cats ########## 2.0000");
        assert_eq!(lines[1], "mice ##### 1.0000");
        assert!(render_bars(&[], 10).is_empty());
    }

    #[test]
    fn output_format_names() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xlsx".parse::<OutputFormat>().is_err());
        assert_eq!(InputFormat::from_path(Path::new("news.JSON")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("news.txt")), InputFormat::Lines);
    }
}
