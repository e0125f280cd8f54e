//! Two-level chunking pipeline
//!
//! Orchestrates the stages for a sentence: level 1 syntactic chunking,
//! optional constituency validation, and level 2 semantic merging.
//! Within one sentence the stages run strictly in sequence; across
//! sentences [`ChunkerPipeline::process_sentences`] fans out with rayon,
//! since sentences share no mutable state.

use crate::chunker::UdChunker;
use crate::errors::{ChunkerError, Result};
use crate::lexicon::Lexicon;
use crate::rules::{MergeOptions, Merger, RuleSet};
use crate::types::{Chunk, ChunkCategory, Sentence, ValidatedChunk};
use crate::validator::{ChunkValidator, DEFAULT_THRESHOLD};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PipelineConfig {
    /// Run the constituency validator between the two chunking levels
    pub validate_chunks: bool,
    /// Pass threshold for the validator
    pub validation_threshold: f64,
    /// Iterate semantic merging to a fixpoint
    pub multi_pass: bool,
    /// Pass bound for multi-pass merging
    pub max_passes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            validate_chunks: false,
            validation_threshold: DEFAULT_THRESHOLD,
            multi_pass: false,
            max_passes: MergeOptions::default().max_passes,
        }
    }
}

impl PipelineConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.validation_threshold) {
            return Err(ChunkerError::invalid_config(format!(
                "validation_threshold must be between 0 and 1, got {}",
                self.validation_threshold
            )));
        }
        if self.max_passes == 0 {
            return Err(ChunkerError::invalid_config("max_passes must be > 0"));
        }
        Ok(())
    }

    /// Builder method: enable the validation stage
    pub fn with_validation(mut self) -> Self {
        self.validate_chunks = true;
        self
    }

    /// Builder method: set the validation threshold
    pub fn with_validation_threshold(mut self, threshold: f64) -> Self {
        self.validation_threshold = threshold;
        self
    }

    /// Builder method: enable multi-pass merging
    pub fn with_multi_pass(mut self) -> Self {
        self.multi_pass = true;
        self
    }

    /// Builder method: set the pass bound
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }
}

/// Everything the pipeline produced for one sentence.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Identifier of the processed sentence
    pub sent_id: String,
    /// Level 1 syntactic chunks
    pub level1: Vec<Chunk>,
    /// Validation results, present when the stage is enabled
    pub validated: Option<Vec<ValidatedChunk>>,
    /// Level 2 semantically merged chunks
    pub level2: Vec<Chunk>,
    /// Merge passes executed
    pub passes: usize,
    /// Total merges applied
    pub total_merges: usize,
    /// False iff merging stopped at the pass bound rather than at a
    /// fixpoint
    pub converged: bool,
}

/// The two-level chunking pipeline.
///
/// Immutable after construction; safe to share across threads.
#[derive(Debug, Clone)]
pub struct ChunkerPipeline {
    chunker: UdChunker,
    validator: ChunkValidator,
    merger: Merger,
    config: PipelineConfig,
}

impl ChunkerPipeline {
    /// Build a pipeline from a compiled rule set, a lexicon, and a
    /// configuration. Fails fast on invalid configuration.
    pub fn new(rules: RuleSet, lexicon: Lexicon, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let lexicon = Arc::new(lexicon);
        Ok(Self {
            chunker: UdChunker::new(),
            validator: ChunkValidator::new(Arc::clone(&lexicon))
                .with_threshold(config.validation_threshold),
            merger: Merger::new(rules, lexicon),
            config,
        })
    }

    /// The pipeline's configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one sentence through all enabled stages.
    pub fn process(&self, sentence: &Sentence) -> PipelineResult {
        let level1 = self.chunker.chunk(sentence);

        let validated = if self.config.validate_chunks {
            Some(self.validator.validate_all(&level1))
        } else {
            None
        };

        let options = MergeOptions {
            multi_pass: self.config.multi_pass,
            max_passes: self.config.max_passes,
        };
        let outcome = self.merger.merge(&level1, &options);

        PipelineResult {
            sent_id: sentence.sent_id.clone(),
            level1,
            validated,
            level2: outcome.chunks,
            passes: outcome.passes,
            total_merges: outcome.total_merges,
            converged: outcome.converged,
        }
    }

    /// Process many sentences in parallel.
    ///
    /// Sentences are independent units of work; results come back in
    /// input order regardless of completion order.
    pub fn process_sentences(&self, sentences: &[Sentence]) -> Vec<PipelineResult> {
        sentences.par_iter().map(|s| self.process(s)).collect()
    }
}

// ============================================================================
// Summary statistics
// ============================================================================

/// Chunk-count summary over one or more chunk sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChunkStats {
    pub total_chunks: usize,
    pub total_tokens: usize,
    pub tokens_per_chunk: f64,
    pub sn_count: usize,
    pub sv_count: usize,
}

impl ChunkStats {
    /// Compute statistics for a flat chunk sequence.
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        let total_chunks = chunks.len();
        let total_tokens: usize = chunks.iter().map(Chunk::len).sum();
        Self {
            total_chunks,
            total_tokens,
            tokens_per_chunk: if total_chunks > 0 {
                total_tokens as f64 / total_chunks as f64
            } else {
                0.0
            },
            sn_count: chunks
                .iter()
                .filter(|c| c.category() == ChunkCategory::Sn)
                .count(),
            sv_count: chunks
                .iter()
                .filter(|c| c.category() == ChunkCategory::Sv)
                .count(),
        }
    }

    /// Compute statistics over the level 2 output of many results.
    pub fn from_results(results: &[PipelineResult]) -> Self {
        let chunks: Vec<Chunk> = results
            .iter()
            .flat_map(|r| r.level2.iter().cloned())
            .collect();
        Self::from_chunks(&chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{ConditionRegistry, RuleDescriptor};
    use crate::types::{Token, UPos};

    fn tok(id: usize, text: &str, lemma: &str, upos: UPos, head: usize, deprel: &str) -> Token {
        Token::new(id, text, lemma, upos, head, deprel)
    }

    /// "Il est 18 h 30"
    fn sample_sentence() -> Sentence {
        Sentence::new(
            "s1",
            "Il est 18 h 30",
            vec![
                tok(1, "Il", "lui", UPos::Pronoun, 4, "nsubj"),
                tok(2, "est", "être", UPos::Aux, 4, "cop"),
                tok(3, "18", "18", UPos::Numeral, 4, "nummod"),
                tok(4, "h", "h", UPos::Noun, 0, "root"),
                tok(5, "30", "30", UPos::Numeral, 4, "nmod"),
            ],
        )
        .unwrap()
    }

    fn sample_rules() -> RuleSet {
        let descriptors = vec![RuleDescriptor::new(
            "subject_verb",
            vec![ChunkCategory::SujV, ChunkCategory::Sv],
            ChunkCategory::Sv,
        )
        .with_condition("adjacent")];
        RuleSet::compile(descriptors, &ConditionRegistry::with_defaults()).unwrap()
    }

    fn pipeline(config: PipelineConfig) -> ChunkerPipeline {
        ChunkerPipeline::new(sample_rules(), Lexicon::french(), config).unwrap()
    }

    #[test]
    fn test_two_level_processing() {
        let p = pipeline(PipelineConfig::default());
        let result = p.process(&sample_sentence());

        // Level 1: [SujV] Il [SV] est [SN] 18 h 30
        assert_eq!(result.level1.len(), 3);
        // Level 2: subject merged into the verb phrase.
        assert_eq!(result.level2.len(), 2);
        assert_eq!(result.level2[0].to_string(), "[SV] Il est");
        assert_eq!(result.level2[1].to_string(), "[SN] 18 h 30");
        assert!(result.validated.is_none());
    }

    #[test]
    fn test_validation_stage() {
        let p = pipeline(PipelineConfig::default().with_validation());
        let result = p.process(&sample_sentence());

        let validated = result.validated.expect("validation enabled");
        assert_eq!(validated.len(), result.level1.len());
    }

    #[test]
    fn test_token_coverage_both_levels() {
        let p = pipeline(PipelineConfig::default().with_multi_pass());
        let sentence = sample_sentence();
        let result = p.process(&sentence);

        for chunks in [&result.level1, &result.level2] {
            let mut ids: Vec<usize> = chunks.iter().flat_map(|c| c.token_ids()).collect();
            ids.sort_unstable();
            assert_eq!(ids, (1..=sentence.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_parallel_matches_serial() {
        let p = pipeline(PipelineConfig::default().with_multi_pass());
        let sentences: Vec<Sentence> = (0..16).map(|_| sample_sentence()).collect();

        let parallel = p.process_sentences(&sentences);
        assert_eq!(parallel.len(), sentences.len());
        for result in &parallel {
            let serial = p.process(&sample_sentence());
            assert_eq!(result.level2, serial.level2);
        }
    }

    #[test]
    fn test_config_validation() {
        let config = PipelineConfig::default().with_validation_threshold(1.5);
        assert!(config.validate().is_err());
        assert!(
            ChunkerPipeline::new(sample_rules(), Lexicon::french(), config).is_err()
        );

        let config = PipelineConfig::default().with_max_passes(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chunk_stats() {
        let p = pipeline(PipelineConfig::default());
        let result = p.process(&sample_sentence());

        let stats = ChunkStats::from_chunks(&result.level2);
        assert_eq!(stats.total_chunks, 2);
        assert_eq!(stats.total_tokens, 5);
        assert_eq!(stats.sn_count, 1);
        assert_eq!(stats.sv_count, 1);
        assert!((stats.tokens_per_chunk - 2.5).abs() < 1e-9);

        let aggregated = ChunkStats::from_results(&[result.clone(), result]);
        assert_eq!(aggregated.total_chunks, 4);

        assert_eq!(ChunkStats::from_chunks(&[]).tokens_per_chunk, 0.0);
    }
}
