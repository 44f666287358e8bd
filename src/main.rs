use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use headline_trends::{
    table::{self, InputFormat, OutputFormat},
    Corpus, PipelineConfig, TrendPipeline, TrendReport,
};

/// Rank the most distinctive keywords of collected news headlines.
///
/// Inputs are headline tables: `.json` files hold an array of strings or of
/// objects with a title field, any other file holds one headline per line.
#[derive(Parser, Debug)]
#[command(name = "headline-trends", version, about)]
struct Cli {
    /// Headline tables to analyze
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of keywords to keep
    #[arg(long, allow_hyphen_values = true)]
    top_k: Option<i64>,

    /// Term-frequency scheme: raw, boolean or log
    #[arg(long)]
    tf: Option<String>,

    /// Inverse-document-frequency scheme: smooth, plain or unary
    #[arg(long)]
    idf: Option<String>,

    /// Averaging convention: corpus or present
    #[arg(long)]
    convention: Option<String>,

    /// Extra stopword, may be repeated
    #[arg(long = "stopword")]
    stopwords: Vec<String>,

    /// Field holding the headline text in JSON inputs
    #[arg(long, default_value = table::DEFAULT_TITLE_FIELD)]
    title_field: String,

    /// Drop exact duplicate headlines when merging inputs
    #[arg(long, conflicts_with = "separate")]
    dedup: bool,

    /// Rank each input on its own instead of merging them into one corpus
    #[arg(long)]
    separate: bool,

    /// Output table format: csv, json or cbor
    #[arg(long, default_value = "csv")]
    format: String,

    /// Output file (merged mode) or directory (separate mode); stdout when omitted in merged mode
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print a bar chart of the ranking to stderr
    #[arg(long)]
    chart: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("headline_trends=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let pipeline = TrendPipeline::new(&config).context("invalid pipeline configuration")?;
    let format: OutputFormat = cli.format.parse()?;

    let corpora = cli
        .inputs
        .iter()
        .map(|path| read_corpus(path, &cli.title_field))
        .collect::<Result<Vec<Corpus>>>()?;

    if cli.separate {
        let dir = cli.output.clone().unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        let names = table::keyword_table_names(&cli.inputs, format);
        for ((path, name), result) in cli.inputs.iter().zip(names).zip(pipeline.run_many(&corpora)) {
            match result {
                Ok(report) => {
                    let out = dir.join(name);
                    write_report(&report, Some(out.as_path()), format, cli.chart)?;
                }
                // one bad input should not hide the others
                Err(err) => warn!(input = %path.display(), error = %err, "skipping input"),
            }
        }
    } else {
        let corpus = table::merge_corpora(&corpora, cli.dedup);
        let report = pipeline.run(&corpus).context("trend pipeline failed")?;
        write_report(&report, cli.output.as_deref(), format, cli.chart)?;
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(top_k) = cli.top_k {
        config.top_k = top_k;
    }
    if let Some(tf) = &cli.tf {
        config.tf_scheme = tf.parse()?;
    }
    if let Some(idf) = &cli.idf {
        config.idf_scheme = idf.parse()?;
    }
    if let Some(convention) = &cli.convention {
        config.score_convention = convention.parse()?;
    }
    config.extra_stopwords.extend(cli.stopwords.iter().cloned());
    config.validate()?;
    Ok(config)
}

fn read_corpus(path: &Path, title_field: &str) -> Result<Corpus> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = BufReader::new(file);
    let corpus = match InputFormat::from_path(path) {
        InputFormat::Json => table::read_json(reader, title_field),
        InputFormat::Lines => table::read_lines(reader),
    }
    .with_context(|| format!("read {}", path.display()))?;
    info!(input = %path.display(), documents = corpus.doc_num(), "loaded headlines");
    Ok(corpus)
}

fn write_report(report: &TrendReport, output: Option<&Path>, format: OutputFormat, chart: bool) -> Result<()> {
    if report.excluded_count() > 0 {
        warn!(
            excluded = report.excluded_count(),
            documents = report.build.input_docs,
            "some documents had no usable text"
        );
    }
    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            table::write_keywords(BufWriter::new(file), &report.keywords, format)?;
            info!(output = %path.display(), keywords = report.keywords.len(), "wrote keyword table");
        }
        None => table::write_keywords(io::stdout().lock(), &report.keywords, format)?,
    }
    if chart {
        let mut stderr = io::stderr().lock();
        stderr.write_all(table::render_bars(&report.keywords, 40).as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_conflicts_with_separate() {
        let err = Cli::try_parse_from(["headline-trends", "--separate", "--dedup", "a.txt"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        assert!(Cli::try_parse_from(["headline-trends", "--dedup", "a.txt", "b.txt"]).is_ok());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
