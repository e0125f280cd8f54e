//! Constituency validation (level 1.5)
//!
//! Scores each chunk against five structural tests from constituency
//! theory: pronominal substitution, coordination, dislocation, cleft
//! construction, and fragment answer. Every test is a pure function of
//! the chunk's own token sequence and category: no sentence context and
//! no dependency-tree re-inspection.
//!
//! Structural markers (coordinators, subordinators, punctuation) always
//! pass: the five tests are inherently inapplicable to function words.

use crate::lexicon::Lexicon;
use crate::types::{Chunk, ChunkCategory, UPos, ValidatedChunk, ValidationFlag, ValidationScore};
use serde::Serialize;
use std::sync::Arc;

// Aggregate weights. Substitution and coordination are the most reliable
// tests and carry slightly more / balanced weight.
const WEIGHT_SUBSTITUTION: f64 = 0.25;
const WEIGHT_COORDINATION: f64 = 0.20;
const WEIGHT_DISLOCATION: f64 = 0.20;
const WEIGHT_CLEFT: f64 = 0.20;
const WEIGHT_FRAGMENT: f64 = 0.15;

/// Default minimum aggregate score for a constituent chunk to pass
pub const DEFAULT_THRESHOLD: f64 = 0.4;

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Validates chunks using linguistic constituency tests.
#[derive(Debug, Clone)]
pub struct ChunkValidator {
    lexicon: Arc<Lexicon>,
    threshold: f64,
}

impl ChunkValidator {
    /// Create a validator over the given lexicon with the default
    /// pass threshold.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Builder method: set the pass threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Run all five constituency tests on a chunk.
    ///
    /// Pure: depends only on the chunk's tokens and category.
    pub fn score(&self, chunk: &Chunk) -> ValidationScore {
        debug_assert!(!chunk.is_empty(), "chunk invariant guarantees tokens");

        let substitution = self.test_substitution(chunk);
        let coordination = self.test_coordination(chunk);
        let dislocation = self.test_dislocation(chunk);
        let cleft = self.test_cleft(chunk);
        let fragment = self.test_fragment(chunk);

        ValidationScore {
            substitution,
            coordination,
            dislocation,
            cleft,
            fragment,
            aggregate: Self::aggregate(substitution, coordination, dislocation, cleft, fragment),
        }
    }

    /// Validate a chunk: score it, derive flags, and decide pass/fail.
    ///
    /// Structural-marker categories pass unconditionally; everything else
    /// passes iff the aggregate meets the threshold.
    pub fn validate(&self, chunk: &Chunk) -> ValidatedChunk {
        let score = self.score(chunk);
        let mut flags = Self::flags(&score, chunk);

        let passed = if chunk.category().is_structural_marker() {
            flags.push(ValidationFlag::StructuralMarker);
            true
        } else {
            score.aggregate >= self.threshold
        };

        ValidatedChunk {
            chunk: chunk.clone(),
            score,
            flags,
            passed,
        }
    }

    /// Validate every chunk in a sequence
    pub fn validate_all(&self, chunks: &[Chunk]) -> Vec<ValidatedChunk> {
        chunks.iter().map(|c| self.validate(c)).collect()
    }

    /// Keep only chunks whose aggregate score meets `min_score`
    pub fn filter_by_score(
        validated: Vec<ValidatedChunk>,
        min_score: f64,
    ) -> Vec<ValidatedChunk> {
        validated
            .into_iter()
            .filter(|vc| vc.score.aggregate >= min_score)
            .collect()
    }

    /// Chunks below `threshold`, for manual review
    pub fn low_confidence<'a>(
        validated: &'a [ValidatedChunk],
        threshold: f64,
    ) -> Vec<&'a ValidatedChunk> {
        validated
            .iter()
            .filter(|vc| vc.score.aggregate < threshold)
            .collect()
    }

    fn aggregate(sub: f64, coord: f64, disl: f64, cleft: f64, frag: f64) -> f64 {
        let mut weighted = sub * WEIGHT_SUBSTITUTION
            + coord * WEIGHT_COORDINATION
            + disl * WEIGHT_DISLOCATION
            + cleft * WEIGHT_CLEFT
            + frag * WEIGHT_FRAGMENT;

        // Penalize badly failed substitution or coordination: those two
        // are the most reliable indicators.
        if sub < 0.2 || coord < 0.2 {
            weighted *= 0.7;
        }

        round3(weighted)
    }

    fn flags(score: &ValidationScore, chunk: &Chunk) -> Vec<ValidationFlag> {
        let mut flags = Vec::new();

        if score.substitution < 0.3 {
            flags.push(ValidationFlag::LowSubstitution);
        }
        if score.coordination < 0.3 {
            flags.push(ValidationFlag::LowCoordination);
        }
        if score.dislocation < 0.3 {
            flags.push(ValidationFlag::LowDislocation);
        }
        if score.cleft < 0.3 {
            flags.push(ValidationFlag::LowCleft);
        }
        if score.fragment < 0.3 {
            flags.push(ValidationFlag::LowFragment);
        }
        if chunk.len() == 1 {
            flags.push(ValidationFlag::SingleToken);
        }
        if chunk.len() > 10 {
            flags.push(ValidationFlag::VeryLong);
        }

        flags
    }

    // ────────────────────────────────────────────────────────────────────
    // The five constituency tests
    // ────────────────────────────────────────────────────────────────────

    /// Can the chunk be replaced by a pronoun?
    ///
    /// Noun phrases pronominalize best (il/elle/le/la/cela); prepositional
    /// phrases go to `y`/`en` depending on the preposition class; verb
    /// phrases and function words rank low.
    fn test_substitution(&self, chunk: &Chunk) -> f64 {
        let has_content = chunk.tokens().iter().any(|t| t.upos.is_content_word());

        let mut score = match chunk.category() {
            ChunkCategory::Sn => {
                if has_content {
                    let has_det = chunk.has_upos(UPos::Determiner);
                    let has_noun = chunk.tokens().iter().any(|t| t.upos.is_nominal());
                    if has_det && has_noun {
                        1.0
                    } else if has_noun {
                        0.85
                    } else {
                        0.9
                    }
                } else {
                    0.3
                }
            }
            ChunkCategory::Sp => {
                if chunk.has_upos(UPos::Adposition) && has_content {
                    self.preposition_class_score(chunk, 0.8, 0.6)
                } else {
                    0.4
                }
            }
            // Already a pronoun: the test does not apply, but the chunk is
            // a minimal constituent.
            ChunkCategory::SujV => 0.7,
            ChunkCategory::ProObj => 0.5,
            ChunkCategory::Sv => {
                if chunk.tokens().iter().any(|t| t.upos.is_verbal()) {
                    0.5
                } else {
                    0.2
                }
            }
            ChunkCategory::SAdj | ChunkCategory::SAdv => 0.4,
            ChunkCategory::Coord | ChunkCategory::CSub => 0.1,
            ChunkCategory::Pct => 0.0,
        };

        if chunk.len() == 1
            && !matches!(chunk.first_token().upos, UPos::ProperNoun | UPos::Pronoun)
        {
            score *= 0.7;
        }
        if !has_content
            && !matches!(chunk.category(), ChunkCategory::SujV | ChunkCategory::ProObj)
        {
            score *= 0.3;
        }

        round3(score)
    }

    /// Category-symmetry coordination heuristic.
    ///
    /// A coordinable chunk must carry a lexical head matching its own
    /// category (an SN needs a nominal, an SAdj an adjective, ...);
    /// without one the category label is asymmetric with its content and
    /// coordination with a same-category partner would be ill-formed.
    fn test_coordination(&self, chunk: &Chunk) -> f64 {
        if chunk.category().is_structural_marker() {
            return 0.0;
        }

        let base = match chunk.category() {
            ChunkCategory::Sn => 0.8,
            ChunkCategory::SAdj | ChunkCategory::Sp => 0.75,
            ChunkCategory::SAdv | ChunkCategory::SujV => 0.6,
            ChunkCategory::Sv => 0.5,
            ChunkCategory::ProObj => 0.3,
            _ => 0.0,
        };

        let has_category_head = match chunk.category() {
            ChunkCategory::Sn => chunk
                .tokens()
                .iter()
                .any(|t| t.upos.is_nominal() || t.upos == UPos::Numeral),
            ChunkCategory::SAdj => chunk.has_upos(UPos::Adjective),
            ChunkCategory::Sp => chunk.has_upos(UPos::Adposition),
            ChunkCategory::SAdv => chunk.has_upos(UPos::Adverb),
            ChunkCategory::Sv => chunk.tokens().iter().any(|t| t.upos.is_verbal()),
            ChunkCategory::SujV | ChunkCategory::ProObj => chunk.has_upos(UPos::Pronoun),
            _ => false,
        };

        let score = if has_category_head {
            (base * 1.1_f64).min(1.0)
        } else {
            base * 0.7
        };

        round3(score)
    }

    /// Can the chunk be moved to the sentence periphery with pronominal
    /// resumption? Argument-like chunks (objects, obliques, PPs with a
    /// `y`/`en`-class preposition) dislocate well; predicates do not.
    fn test_dislocation(&self, chunk: &Chunk) -> f64 {
        let has_content = chunk.tokens().iter().any(|t| t.upos.is_content_word());

        let mut score = match chunk.category() {
            ChunkCategory::Sn => {
                if has_content {
                    let argument_role = chunk
                        .tokens()
                        .iter()
                        .any(|t| matches!(t.base_deprel(), "obj" | "iobj" | "obl" | "nmod"));
                    if argument_role {
                        0.9
                    } else {
                        0.7
                    }
                } else {
                    0.3
                }
            }
            ChunkCategory::Sp => {
                if chunk.has_upos(UPos::Adposition) && has_content {
                    self.preposition_class_score(chunk, 0.85, 0.6)
                } else {
                    0.3
                }
            }
            ChunkCategory::SujV => 0.3,
            ChunkCategory::Sv => 0.2,
            ChunkCategory::SAdv => 0.5,
            ChunkCategory::SAdj => 0.3,
            ChunkCategory::ProObj => 0.4,
            ChunkCategory::Coord | ChunkCategory::CSub | ChunkCategory::Pct => 0.0,
        };

        if chunk.len() == 1 && chunk.first_token().upos != UPos::ProperNoun {
            score *= 0.7;
        }
        if !has_content && chunk.category() != ChunkCategory::SujV {
            score *= 0.3;
        }

        round3(score)
    }

    /// Does the chunk work as the focus of a cleft ("C'est ... que/qui")?
    fn test_cleft(&self, chunk: &Chunk) -> f64 {
        let has_content = chunk
            .tokens()
            .iter()
            .any(|t| t.upos.is_content_word() || t.upos == UPos::Adjective);

        let mut score = match chunk.category() {
            ChunkCategory::Sn => {
                if has_content {
                    if chunk.tokens().iter().any(|t| t.upos.is_nominal()) {
                        0.95
                    } else {
                        0.6
                    }
                } else {
                    0.3
                }
            }
            ChunkCategory::Sp => {
                if chunk.has_upos(UPos::Adposition) && has_content {
                    0.75
                } else {
                    0.4
                }
            }
            ChunkCategory::SAdv => 0.65,
            ChunkCategory::SujV => 0.6,
            ChunkCategory::SAdj => 0.5,
            ChunkCategory::ProObj => 0.2,
            ChunkCategory::Sv => 0.15,
            ChunkCategory::Coord | ChunkCategory::CSub | ChunkCategory::Pct => 0.0,
        };

        // Predicates never cleft.
        if chunk.category() == ChunkCategory::Sv
            && chunk.tokens().iter().any(|t| t.upos.is_verbal())
        {
            score *= 0.2;
        }
        if chunk.len() == 1 && !has_content {
            score *= 0.3;
        }

        round3(score)
    }

    /// Can the chunk answer a question in isolation?
    fn test_fragment(&self, chunk: &Chunk) -> f64 {
        let is_fragment_content = |upos: UPos| {
            upos.is_content_word()
                || matches!(upos, UPos::Verb | UPos::Adjective | UPos::Adverb)
        };
        let content_count = chunk
            .tokens()
            .iter()
            .filter(|t| is_fragment_content(t.upos))
            .count();

        if content_count == 0 {
            // No content words: nothing meaningful to answer with.
            return 0.1;
        }

        let mut score = match chunk.category() {
            ChunkCategory::Sn => {
                if chunk.tokens().iter().any(|t| t.upos.is_nominal()) {
                    if chunk.has_upos(UPos::Determiner) || chunk.len() >= 2 {
                        0.95
                    } else {
                        0.8
                    }
                } else {
                    0.6
                }
            }
            ChunkCategory::Sp => {
                if chunk.has_upos(UPos::Adposition) {
                    0.85
                } else {
                    0.5
                }
            }
            ChunkCategory::SAdv => 0.8,
            ChunkCategory::Sv => {
                if chunk.tokens().iter().any(|t| t.upos.is_verbal()) {
                    0.7
                } else {
                    0.3
                }
            }
            ChunkCategory::SAdj => {
                if chunk.has_upos(UPos::Adjective) {
                    0.65
                } else {
                    0.3
                }
            }
            ChunkCategory::SujV => 0.4,
            ChunkCategory::ProObj => 0.2,
            ChunkCategory::Coord | ChunkCategory::CSub | ChunkCategory::Pct => 0.0,
        };

        // Multi-word content chunks stand alone better.
        if chunk.len() >= 3 && content_count >= 2 {
            score = (score * 1.1_f64).min(1.0);
        }

        round3(score)
    }

    /// Score a PP by the resumption class of its leading preposition:
    /// `strong` for `y`/`en`-compatible prepositions, `weak` otherwise.
    fn preposition_class_score(&self, chunk: &Chunk, strong: f64, weak: f64) -> f64 {
        let first = chunk.first_token();
        if first.upos == UPos::Adposition
            && (self.lexicon.preposition_takes_y(&first.lemma)
                || self.lexicon.preposition_takes_en(&first.lemma))
        {
            strong
        } else {
            weak
        }
    }
}

// ============================================================================
// Summary statistics
// ============================================================================

/// Aggregate statistics over a set of validated chunks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationStats {
    pub total_chunks: usize,
    pub passed_chunks: usize,
    pub pass_rate: f64,
    pub avg_aggregate: f64,
    pub min_aggregate: f64,
    pub max_aggregate: f64,
}

impl ValidationStats {
    /// Compute statistics for a set of validated chunks.
    pub fn from_validated(validated: &[ValidatedChunk]) -> Self {
        if validated.is_empty() {
            return Self::default();
        }

        let total = validated.len();
        let passed = validated.iter().filter(|vc| vc.passed).count();
        let aggregates: Vec<f64> = validated.iter().map(|vc| vc.score.aggregate).collect();
        let sum: f64 = aggregates.iter().sum();

        Self {
            total_chunks: total,
            passed_chunks: passed,
            pass_rate: passed as f64 / total as f64,
            avg_aggregate: sum / total as f64,
            min_aggregate: aggregates.iter().cloned().fold(f64::INFINITY, f64::min),
            max_aggregate: aggregates.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}
