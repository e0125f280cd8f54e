//! Integration tests for ud_chunker

use ud_chunker::*;

fn tok(id: usize, text: &str, lemma: &str, upos: UPos, head: usize, deprel: &str) -> Token {
    Token::new(id, text, lemma, upos, head, deprel)
}

fn np(id: usize, text: &str, upos: UPos) -> Chunk {
    Chunk::new(
        ChunkCategory::Sn,
        vec![tok(id, text, text, upos, 0, "root")],
    )
}

fn registry() -> ConditionRegistry {
    ConditionRegistry::with_defaults()
}

/// "Jean dort à l'hôpital ."
fn hospital_sentence() -> Sentence {
    Sentence::new(
        "s1",
        "Jean dort à l' hôpital .",
        vec![
            tok(1, "Jean", "Jean", UPos::ProperNoun, 2, "nsubj"),
            tok(2, "dort", "dormir", UPos::Verb, 0, "root"),
            tok(3, "à", "à", UPos::Adposition, 5, "case"),
            tok(4, "l'", "le", UPos::Determiner, 5, "det"),
            tok(5, "hôpital", "hôpital", UPos::Noun, 2, "obl"),
            tok(6, ".", ".", UPos::Punctuation, 2, "punct"),
        ],
    )
    .unwrap()
}

#[test]
fn test_full_pipeline() {
    let rules = RuleSet::from_json(
        r#"[
            {"rule_id": "subject_verb", "pattern": ["SN", "SV"],
             "result_category": "SV", "condition": "adjacent"},
            {"rule_id": "verb_object", "pattern": ["SV", "SN"],
             "result_category": "SV", "condition": "adjacent_no_punctuation"}
        ]"#,
        &registry(),
    )
    .unwrap();

    let pipeline = ChunkerPipeline::new(
        rules,
        Lexicon::french(),
        PipelineConfig::default().with_validation().with_multi_pass(),
    )
    .unwrap();

    let result = pipeline.process(&hospital_sentence());

    // Level 1: [SN] Jean [SV] dort [SN] à l' hôpital [Pct] .
    assert_eq!(result.level1.len(), 4);
    // Level 2: everything except punctuation folds into the verb phrase.
    assert_eq!(result.level2.len(), 2);
    assert_eq!(result.level2[0].to_string(), "[SV] Jean dort à l' hôpital");
    assert_eq!(result.level2[1].to_string(), "[Pct] .");
    assert!(result.converged);

    let validated = result.validated.expect("validation enabled");
    assert_eq!(validated.len(), 4);
    // The punctuation chunk is a structural marker and passes anyway.
    assert!(validated.iter().all(|vc| !vc.passed
        || vc.score.aggregate >= 0.4
        || vc.category().is_structural_marker()));
}

#[test]
fn test_total_coverage_after_both_stages() {
    let sentence = hospital_sentence();
    let chunks = UdChunker::new().chunk(&sentence);

    let all_ids = |chunks: &[Chunk]| {
        let mut ids: Vec<usize> = chunks.iter().flat_map(|c| c.token_ids()).collect();
        ids.sort_unstable();
        ids
    };
    let expected: Vec<usize> = (1..=sentence.len()).collect();
    assert_eq!(all_ids(&chunks), expected);

    let rules = RuleSet::compile(
        vec![RuleDescriptor::new(
            "np_chain",
            vec![ChunkCategory::Sn, ChunkCategory::Sn],
            ChunkCategory::Sn,
        )],
        &registry(),
    )
    .unwrap();
    let merger = Merger::new(rules, std::sync::Arc::new(Lexicon::french()));
    let outcome = merger.merge(&chunks, &MergeOptions::default().multi_pass());
    assert_eq!(all_ids(&outcome.chunks), expected);
}

#[test]
fn test_temporal_merge_scenario() {
    // "18 h 30 ce lundi 27 janvier", pre-chunked into seven single-token
    // nominal chunks. A temporal-merge rule in multi-pass mode must fuse
    // them into exactly one chunk.
    let chunks = vec![
        np(1, "18", UPos::Numeral),
        np(2, "h", UPos::Noun),
        np(3, "30", UPos::Numeral),
        np(4, "ce", UPos::Determiner),
        np(5, "lundi", UPos::Noun),
        np(6, "27", UPos::Numeral),
        np(7, "janvier", UPos::Noun),
    ];

    let rules = RuleSet::from_json(
        r#"[
            {"rule_id": "temporal_merge", "pattern": ["SN", "SN"],
             "result_category": "SN", "condition": "both_temporal"}
        ]"#,
        &registry(),
    )
    .unwrap();
    let merger = Merger::new(rules, std::sync::Arc::new(Lexicon::french()));

    let outcome = merger.merge(&chunks, &MergeOptions::default().multi_pass());
    assert_eq!(outcome.chunks.len(), 1);
    assert_eq!(outcome.chunks[0].text(), "18 h 30 ce lundi 27 janvier");
    assert_eq!(outcome.chunks[0].category(), ChunkCategory::Sn);
    assert!(outcome.converged);

    // Non-temporal neighbors must not be swept in.
    let mut with_cat = chunks.clone();
    with_cat.push(np(8, "chat", UPos::Noun));
    let outcome = merger.merge(&with_cat, &MergeOptions::default().multi_pass());
    assert_eq!(outcome.chunks.len(), 2);
    assert_eq!(outcome.chunks[1].text(), "chat");
}

#[test]
fn test_priority_specific_rule_beats_fallback() {
    // Both rules match [SN, SN] at position 0; the specific (earlier)
    // rule must fire.
    let rules = RuleSet::compile(
        vec![
            RuleDescriptor::new(
                "temporal_merge",
                vec![ChunkCategory::Sn, ChunkCategory::Sn],
                ChunkCategory::SAdv,
            )
            .with_condition("both_temporal"),
            RuleDescriptor::new(
                "np_fallback",
                vec![ChunkCategory::Sn, ChunkCategory::Sn],
                ChunkCategory::Sn,
            ),
        ],
        &registry(),
    )
    .unwrap();
    let merger = Merger::new(rules, std::sync::Arc::new(Lexicon::french()));

    // Temporal pair: the specific rule applies and relabels to SAdv.
    let outcome = merger.merge(
        &[np(1, "lundi", UPos::Noun), np(2, "janvier", UPos::Noun)],
        &MergeOptions::default(),
    );
    assert_eq!(outcome.chunks[0].category(), ChunkCategory::SAdv);

    // Non-temporal pair: the specific rule's condition fails, the
    // fallback fires instead.
    let outcome = merger.merge(
        &[np(1, "chat", UPos::Noun), np(2, "souris", UPos::Noun)],
        &MergeOptions::default(),
    );
    assert_eq!(outcome.chunks[0].category(), ChunkCategory::Sn);
}

#[test]
fn test_cycle_safety() {
    // A head chain that cycles back on itself must not hang or crash.
    let sentence = Sentence::new(
        "cyclic",
        "a b c",
        vec![
            tok(1, "a", "a", UPos::Noun, 2, "nmod"),
            tok(2, "b", "b", UPos::Noun, 3, "nmod"),
            tok(3, "c", "c", UPos::Noun, 1, "nmod"),
        ],
    )
    .unwrap();

    let chunks = UdChunker::new().chunk(&sentence);
    let mut ids: Vec<usize> = chunks.iter().flat_map(|c| c.token_ids()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_validator_auto_pass_for_structural_markers() {
    let validator = ChunkValidator::new(std::sync::Arc::new(Lexicon::french()));

    for (category, text, upos) in [
        (ChunkCategory::Coord, "et", UPos::CoordConj),
        (ChunkCategory::CSub, "que", UPos::SubConj),
        (ChunkCategory::Pct, ",", UPos::Punctuation),
    ] {
        let chunk = Chunk::new(category, vec![tok(1, text, text, upos, 0, "root")]);
        let vc = validator.validate(&chunk);
        assert!(vc.passed, "{category} should auto-pass");
        assert!(vc.flags.contains(&ValidationFlag::StructuralMarker));
    }
}

#[test]
fn test_multi_pass_idempotence() {
    let rules = RuleSet::from_json(
        r#"[
            {"rule_id": "subject_verb", "pattern": ["SujV", "SV"],
             "result_category": "SV"},
            {"rule_id": "temporal_merge", "pattern": ["SN", "SN"],
             "result_category": "SN", "condition": "both_temporal"}
        ]"#,
        &registry(),
    )
    .unwrap();
    let merger = Merger::new(rules, std::sync::Arc::new(Lexicon::french()));

    let chunks = vec![
        Chunk::new(
            ChunkCategory::SujV,
            vec![tok(1, "Il", "lui", UPos::Pronoun, 2, "nsubj")],
        ),
        Chunk::new(
            ChunkCategory::Sv,
            vec![tok(2, "est", "être", UPos::Aux, 0, "cop")],
        ),
        np(3, "lundi", UPos::Noun),
        np(4, "janvier", UPos::Noun),
    ];

    let options = MergeOptions::default().multi_pass();
    let first = merger.merge(&chunks, &options);
    assert!(first.converged);

    let second = merger.merge(&first.chunks, &options);
    assert_eq!(second.chunks, first.chunks);
    assert_eq!(second.total_merges, 0);
}

#[test]
fn test_determinism_across_runs() {
    let build = || {
        RuleSet::from_json(
            r#"[
                {"rule_id": "subject_verb", "pattern": ["SN", "SV"],
                 "result_category": "SV"},
                {"rule_id": "verb_object", "pattern": ["SV", "SN"],
                 "result_category": "SV", "condition": "adjacent_no_punctuation"}
            ]"#,
            &registry(),
        )
        .unwrap()
    };

    let sentence = hospital_sentence();
    let reference = {
        let pipeline = ChunkerPipeline::new(
            build(),
            Lexicon::french(),
            PipelineConfig::default().with_multi_pass(),
        )
        .unwrap();
        pipeline.process(&sentence)
    };

    for _ in 0..5 {
        let pipeline = ChunkerPipeline::new(
            build(),
            Lexicon::french(),
            PipelineConfig::default().with_multi_pass(),
        )
        .unwrap();
        let run = pipeline.process(&sentence);
        assert_eq!(run.level1, reference.level1);
        assert_eq!(run.level2, reference.level2);
        assert_eq!(run.passes, reference.passes);
    }
}

#[test]
fn test_absent_condition_merges_unconditionally() {
    let rules = RuleSet::compile(
        vec![RuleDescriptor::new(
            "plain",
            vec![ChunkCategory::Sn, ChunkCategory::Sn],
            ChunkCategory::Sn,
        )],
        &registry(),
    )
    .unwrap();
    let merger = Merger::new(rules, std::sync::Arc::new(Lexicon::french()));

    let outcome = merger.merge(
        &[np(1, "chat", UPos::Noun), np(2, "souris", UPos::Noun)],
        &MergeOptions::default(),
    );
    assert_eq!(outcome.chunks.len(), 1);
}

#[test]
fn test_unknown_condition_is_build_time_error() {
    let err = RuleSet::from_json(
        r#"[{"rule_id": "broken", "pattern": ["SN"],
             "result_category": "SN", "condition": "adjacnet"}]"#,
        &registry(),
    )
    .unwrap_err();

    assert!(matches!(err, ChunkerError::UnknownCondition { .. }));
    assert!(err.is_config_error());
}

#[test]
fn test_conllu_to_chunks() {
    let text = "\
# sent_id = gorafi-1
# text = Il est 18 h 30.
1\tIl\tlui\tPRON\t_\t_\t4\tnsubj\t_\t_
2\test\têtre\tAUX\t_\t_\t4\tcop\t_\t_
3\t18\t18\tNUM\t_\t_\t4\tnummod\t_\t_
4\th\th\tNOUN\t_\t_\t0\troot\t_\t_
5\t30\t30\tNUM\t_\t_\t4\tnmod\t_\t_
6\t.\t.\tPUNCT\t_\t_\t4\tpunct\t_\t_
";
    let sentences = conllu::parse(text).unwrap();
    assert_eq!(sentences.len(), 1);

    let chunks = UdChunker::new().chunk(&sentences[0]);
    let rendered: Vec<String> = chunks.iter().map(|c| c.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["[SujV] Il", "[SV] est", "[SN] 18 h 30", "[Pct] ."]
    );
}

#[test]
fn test_parallel_sentence_processing_preserves_order() {
    let rules = RuleSet::compile(
        vec![RuleDescriptor::new(
            "subject_verb",
            vec![ChunkCategory::Sn, ChunkCategory::Sv],
            ChunkCategory::Sv,
        )],
        &registry(),
    )
    .unwrap();
    let pipeline =
        ChunkerPipeline::new(rules, Lexicon::french(), PipelineConfig::default()).unwrap();

    let sentences: Vec<Sentence> = (0..32)
        .map(|i| {
            Sentence::new(
                format!("s{i}"),
                "Jean dort",
                vec![
                    tok(1, "Jean", "Jean", UPos::ProperNoun, 2, "nsubj"),
                    tok(2, "dort", "dormir", UPos::Verb, 0, "root"),
                ],
            )
            .unwrap()
        })
        .collect();

    let results = pipeline.process_sentences(&sentences);
    assert_eq!(results.len(), 32);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.sent_id, format!("s{i}"));
        assert_eq!(result.level2.len(), 1);
        assert_eq!(result.level2[0].text(), "Jean dort");
    }
}

#[test]
fn test_chunk_output_serializes() {
    let chunks = UdChunker::new().chunk(&hospital_sentence());
    let json = serde_json::to_string(&chunks).unwrap();
    assert!(json.contains(r#""category":"SN""#));
    assert!(json.contains("Jean"));
}
