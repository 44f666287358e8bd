use headline_trends::{
    rank, table, Corpus, IdfScheme, Normalizer, PipelineConfig, TfIdfEngine, TfIdfMatrix, TfScheme,
    TrendError, TrendPipeline, VocabularyBuilder, Weighting,
};

const HEADLINES: &[&str] = &[
    "Storm batters coast as thousands lose power",
    "Power restored to thousands after storm",
    "Senate passes budget after long debate",
    "Budget talks stall in the Senate again",
    "Local team wins championship in overtime",
    "",
    "The and of",
    "Coast guard rescues sailors after storm",
];

fn default_pipeline() -> TrendPipeline {
    TrendPipeline::new(&PipelineConfig::default()).unwrap()
}

#[test]
fn scenario_two_documents_share_terms() {
    let normalizer = Normalizer::english();
    let out = VocabularyBuilder::new(&normalizer)
        .build(&Corpus::from_texts(["Cats chase mice.", "Dogs chase cats."]))
        .unwrap();
    let terms: Vec<&str> = out.vocabulary.iter().collect();
    assert_eq!(terms, vec!["cats", "chase", "mice", "dogs"]);

    let tfidf: TfIdfMatrix = Weighting::default().weight(&out.matrix);
    assert_eq!(tfidf.doc_freq(), &[2, 2, 1, 1]);
    let idf = tfidf.idf_vec();
    assert!(idf[2] > idf[1]);
    assert_eq!(idf[2], idf[3]);
}

#[test]
fn scenario_empty_document_keeps_its_row() {
    let normalizer = Normalizer::english();
    let out = VocabularyBuilder::new(&normalizer)
        .build(&Corpus::from_texts(["", "only one real document"]))
        .unwrap();
    assert_eq!(out.matrix.row_num(), 2);
    assert_eq!(out.matrix.row(0).unwrap().nnz(), 0);

    let tfidf: TfIdfMatrix = Weighting::default().weight(&out.matrix);
    let ranked = rank(&tfidf, &out.vocabulary, 10).unwrap();
    assert_eq!(ranked.len(), out.vocabulary.len());
}

#[test]
fn scenario_zero_top_k() {
    let normalizer = Normalizer::english();
    let out = VocabularyBuilder::new(&normalizer)
        .build(&Corpus::from_texts(["some words"]))
        .unwrap();
    let tfidf: TfIdfMatrix = Weighting::default().weight(&out.matrix);
    assert!(matches!(rank(&tfidf, &out.vocabulary, 0), Err(TrendError::InvalidArgument(_))));
}

#[test]
fn scenario_empty_corpus() {
    let normalizer = Normalizer::english();
    let err = VocabularyBuilder::new(&normalizer).build(&Corpus::new()).unwrap_err();
    assert!(matches!(err, TrendError::EmptyCorpus(_)));
    assert!(matches!(default_pipeline().run(&Corpus::new()), Err(TrendError::EmptyCorpus(_))));
}

#[test]
fn ranking_is_sorted_with_index_tiebreak() {
    let normalizer = Normalizer::english();
    let out = VocabularyBuilder::new(&normalizer)
        .build(&Corpus::from_texts(HEADLINES))
        .unwrap();
    let tfidf: TfIdfMatrix = Weighting::default().weight(&out.matrix);
    let ranked = rank(&tfidf, &out.vocabulary, usize::MAX).unwrap();
    for pair in ranked.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.score >= b.score);
        if a.score == b.score {
            assert!(out.vocabulary.index_of(&a.term) < out.vocabulary.index_of(&b.term));
        }
    }
    assert_eq!(ranked[0].term, "storm");
}

#[test]
fn vocabulary_holds_exactly_the_distinct_terms() {
    let normalizer = Normalizer::english();
    let out = VocabularyBuilder::new(&normalizer)
        .build(&Corpus::from_texts(HEADLINES))
        .unwrap();
    let mut distinct: Vec<String> = HEADLINES
        .iter()
        .flat_map(|h| normalizer.normalize(h))
        .map(|t| t.as_str().to_string())
        .collect();
    distinct.sort();
    distinct.dedup();
    assert_eq!(out.vocabulary.len(), distinct.len());
    for term in &distinct {
        assert!(out.vocabulary.contains(term));
    }
    assert!(!out.vocabulary.contains("the"));
    assert!(out.matrix.document_frequencies().iter().all(|&df| df > 0));
}

#[test]
fn absent_terms_always_weigh_zero() {
    let normalizer = Normalizer::english();
    let out = VocabularyBuilder::new(&normalizer)
        .build(&Corpus::from_texts(HEADLINES))
        .unwrap();
    let tfidf: TfIdfMatrix = Weighting::new(TfScheme::Log, IdfScheme::Plain).weight(&out.matrix);
    for row in 0..out.matrix.row_num() {
        for col in 0..out.matrix.col_num() {
            let weight = tfidf.weight(row, col);
            assert!(weight >= 0.0);
            if out.matrix.count(row, col) == 0 {
                assert_eq!(weight, 0.0);
            }
        }
    }
}

#[test]
fn row_count_matches_corpus_size() {
    let normalizer = Normalizer::english();
    let out = VocabularyBuilder::new(&normalizer)
        .build(&Corpus::from_texts(HEADLINES))
        .unwrap();
    assert_eq!(out.matrix.row_num(), HEADLINES.len());
    assert_eq!(out.report.empty_docs, 2);
}

#[test]
fn pipeline_is_idempotent() {
    let pipeline = default_pipeline();
    let first = pipeline.run_texts(HEADLINES).unwrap();
    let second = pipeline.run_texts(HEADLINES).unwrap();
    assert_eq!(first, second);
}

#[test]
fn top_k_beyond_vocabulary_returns_full_ranking() {
    let config = PipelineConfig { top_k: 10_000, ..PipelineConfig::default() };
    let report = TrendPipeline::new(&config).unwrap().run_texts(HEADLINES).unwrap();
    assert_eq!(report.keywords.len(), report.vocabulary_size);
}

#[test]
fn missing_titles_are_reported_not_blanked() {
    let input = r#"[
        {"title": "Storm hits coast"},
        {"title": null},
        {"link": "https://example.com"},
        {"title": "Storm moves inland"}
    ]"#;
    let corpus = table::read_json(input.as_bytes(), table::DEFAULT_TITLE_FIELD).unwrap();
    let report = default_pipeline().run(&corpus).unwrap();
    assert_eq!(report.build.input_docs, 4);
    assert_eq!(report.build.accepted_docs, 2);
    assert_eq!(report.excluded_count(), 2);
    let excluded: Vec<usize> = report.build.excluded.iter().map(|e| e.doc_id).collect();
    assert_eq!(excluded, vec![1, 2]);
    assert_eq!(report.keywords[0].term, "storm");
}

#[test]
fn keyword_table_round_trips_through_csv_writer() {
    let report = default_pipeline().run_texts(HEADLINES).unwrap();
    let mut out = Vec::new();
    table::write_keywords(&mut out, &report.keywords, table::OutputFormat::Csv).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("keyword,tfidf"));
    assert_eq!(lines.count(), report.keywords.len());
}
