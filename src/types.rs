//! Core types for ud_chunker
//!
//! This module defines the fundamental data structures used throughout the
//! library: Universal Dependencies tokens and sentences on the input side,
//! chunks and validation scores on the output side.

use crate::errors::{ChunkerError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Universal POS tags
// ============================================================================

/// Universal Dependencies coarse part-of-speech tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UPos {
    #[serde(rename = "NOUN")]
    Noun,
    #[serde(rename = "PROPN")]
    ProperNoun,
    #[serde(rename = "VERB")]
    Verb,
    #[serde(rename = "AUX")]
    Aux,
    #[serde(rename = "PRON")]
    Pronoun,
    #[serde(rename = "DET")]
    Determiner,
    #[serde(rename = "ADP")]
    Adposition,
    #[serde(rename = "ADJ")]
    Adjective,
    #[serde(rename = "ADV")]
    Adverb,
    #[serde(rename = "SCONJ")]
    SubConj,
    #[serde(rename = "CCONJ")]
    CoordConj,
    #[serde(rename = "NUM")]
    Numeral,
    #[serde(rename = "PART")]
    Particle,
    #[serde(rename = "INTJ")]
    Interjection,
    #[serde(rename = "PUNCT")]
    Punctuation,
    #[serde(rename = "SYM")]
    Symbol,
    #[serde(rename = "X")]
    Other,
}

impl UPos {
    /// Parse from a CoNLL-U UPOS column value. Unknown tags map to `X`.
    pub fn from_conllu(tag: &str) -> Self {
        match tag {
            "NOUN" => UPos::Noun,
            "PROPN" => UPos::ProperNoun,
            "VERB" => UPos::Verb,
            "AUX" => UPos::Aux,
            "PRON" => UPos::Pronoun,
            "DET" => UPos::Determiner,
            "ADP" => UPos::Adposition,
            "ADJ" => UPos::Adjective,
            "ADV" => UPos::Adverb,
            "SCONJ" => UPos::SubConj,
            "CCONJ" => UPos::CoordConj,
            "NUM" => UPos::Numeral,
            "PART" => UPos::Particle,
            "INTJ" => UPos::Interjection,
            "PUNCT" => UPos::Punctuation,
            "SYM" => UPos::Symbol,
            _ => UPos::Other,
        }
    }

    /// Get the CoNLL-U tag string for this enum.
    pub fn as_str(&self) -> &'static str {
        match self {
            UPos::Noun => "NOUN",
            UPos::ProperNoun => "PROPN",
            UPos::Verb => "VERB",
            UPos::Aux => "AUX",
            UPos::Pronoun => "PRON",
            UPos::Determiner => "DET",
            UPos::Adposition => "ADP",
            UPos::Adjective => "ADJ",
            UPos::Adverb => "ADV",
            UPos::SubConj => "SCONJ",
            UPos::CoordConj => "CCONJ",
            UPos::Numeral => "NUM",
            UPos::Particle => "PART",
            UPos::Interjection => "INTJ",
            UPos::Punctuation => "PUNCT",
            UPos::Symbol => "SYM",
            UPos::Other => "X",
        }
    }

    /// Check if this tag carries nominal lexical content (noun, proper
    /// noun, or numeral). Used by the constituency tests.
    pub fn is_content_word(&self) -> bool {
        matches!(self, UPos::Noun | UPos::ProperNoun | UPos::Numeral)
    }

    /// Check if this tag represents a noun (common or proper)
    pub fn is_nominal(&self) -> bool {
        matches!(self, UPos::Noun | UPos::ProperNoun)
    }

    /// Check if this tag represents a verb or auxiliary
    pub fn is_verbal(&self) -> bool {
        matches!(self, UPos::Verb | UPos::Aux)
    }

    /// Check if this tag is punctuation
    pub fn is_punctuation(&self) -> bool {
        matches!(self, UPos::Punctuation)
    }
}

// ============================================================================
// Token
// ============================================================================

/// A single token with Universal Dependencies annotation.
///
/// Tokens are immutable once created: the rest of the pipeline only ever
/// reads them, and chunks hold their own copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Token id, 1-based and unique within a sentence
    pub id: usize,
    /// Surface form
    pub text: String,
    /// Lemma / dictionary form
    pub lemma: String,
    /// Universal POS tag
    pub upos: UPos,
    /// Id of the syntactic head (0 = tree root)
    pub head: usize,
    /// Dependency relation, possibly with a `:subtype` suffix
    pub deprel: String,
}

impl Token {
    /// Create a new token
    pub fn new(
        id: usize,
        text: impl Into<String>,
        lemma: impl Into<String>,
        upos: UPos,
        head: usize,
        deprel: impl Into<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            lemma: lemma.into(),
            upos,
            head,
            deprel: deprel.into(),
        }
    }

    /// Get the base dependency relation without subtypes
    /// (e.g. `nsubj` from `nsubj:pass`).
    pub fn base_deprel(&self) -> &str {
        self.deprel.split(':').next().unwrap_or(&self.deprel)
    }

    /// Check if this token is the root of the sentence
    pub fn is_root(&self) -> bool {
        self.head == 0
    }

    /// Check if this token is punctuation
    pub fn is_punctuation(&self) -> bool {
        self.upos.is_punctuation()
    }
}

// ============================================================================
// Sentence
// ============================================================================

/// A sentence with Universal Dependencies annotation.
///
/// Provides token access by id and basic dependency-tree navigation. The
/// token list is validated on construction: ids must be unique and
/// contiguous from 1. Out-of-range `head` values are accepted here; the
/// chunker handles them fail-soft.
#[derive(Debug, Clone)]
pub struct Sentence {
    /// Sentence identifier
    pub sent_id: String,
    /// Raw sentence text
    pub text: String,
    tokens: Vec<Token>,
    /// id → position in `tokens`
    index: FxHashMap<usize, usize>,
}

impl Sentence {
    /// Create a sentence, validating the token-id contract.
    pub fn new(
        sent_id: impl Into<String>,
        text: impl Into<String>,
        tokens: Vec<Token>,
    ) -> Result<Self> {
        let mut index =
            FxHashMap::with_capacity_and_hasher(tokens.len(), Default::default());
        for (pos, token) in tokens.iter().enumerate() {
            if index.insert(token.id, pos).is_some() {
                return Err(ChunkerError::invalid_sentence(format!(
                    "duplicate token id {}",
                    token.id
                )));
            }
        }
        for id in 1..=tokens.len() {
            if !index.contains_key(&id) {
                return Err(ChunkerError::invalid_sentence(format!(
                    "token ids are not contiguous from 1: missing id {}",
                    id
                )));
            }
        }
        Ok(Self {
            sent_id: sent_id.into(),
            text: text.into(),
            tokens,
            index,
        })
    }

    /// The tokens of this sentence, in input order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if the sentence has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get a token by id, or `None` if not present
    pub fn token(&self, id: usize) -> Option<&Token> {
        self.index.get(&id).map(|&pos| &self.tokens[pos])
    }

    /// Check if the sentence contains a token with the given id
    pub fn has_token(&self, id: usize) -> bool {
        self.index.contains_key(&id)
    }

    /// Get all tokens whose head is the given token id.
    ///
    /// This is a derived view recomputed on each call; sentences are never
    /// mutated, so there is nothing to cache.
    pub fn children(&self, id: usize) -> Vec<&Token> {
        self.tokens.iter().filter(|t| t.head == id).collect()
    }
}

// ============================================================================
// Chunk categories
// ============================================================================

/// Chunk category labels.
///
/// The French syntagm inventory used by both chunking levels:
///
/// - `SN`: syntagme nominal (noun phrase)
/// - `SV`: syntagme verbal (verb phrase)
/// - `SP`: syntagme prépositionnel (prepositional phrase)
/// - `SAdj`: syntagme adjectival
/// - `SAdv`: syntagme adverbial
/// - `SujV`: subject pronoun
/// - `Pro_Obj`: object pronoun
/// - `CSub`: subordinating conjunction
/// - `Coord`: coordinating conjunction
/// - `Pct`: punctuation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ChunkCategory {
    #[serde(rename = "SN")]
    Sn,
    #[serde(rename = "SV")]
    Sv,
    #[serde(rename = "SP")]
    Sp,
    #[serde(rename = "SAdj")]
    SAdj,
    #[serde(rename = "SAdv")]
    SAdv,
    #[serde(rename = "SujV")]
    SujV,
    #[serde(rename = "Pro_Obj")]
    ProObj,
    #[serde(rename = "CSub")]
    CSub,
    #[serde(rename = "Coord")]
    Coord,
    #[serde(rename = "Pct")]
    Pct,
}

impl ChunkCategory {
    /// Get the label string for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkCategory::Sn => "SN",
            ChunkCategory::Sv => "SV",
            ChunkCategory::Sp => "SP",
            ChunkCategory::SAdj => "SAdj",
            ChunkCategory::SAdv => "SAdv",
            ChunkCategory::SujV => "SujV",
            ChunkCategory::ProObj => "Pro_Obj",
            ChunkCategory::CSub => "CSub",
            ChunkCategory::Coord => "Coord",
            ChunkCategory::Pct => "Pct",
        }
    }

    /// Check if this category is a structural marker (coordinator,
    /// subordinator, punctuation). Structural markers auto-pass
    /// constituency validation: the five tests are inapplicable to
    /// function words.
    pub fn is_structural_marker(&self) -> bool {
        matches!(
            self,
            ChunkCategory::Coord | ChunkCategory::CSub | ChunkCategory::Pct
        )
    }
}

impl fmt::Display for ChunkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkCategory {
    type Err = ChunkerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SN" => Ok(ChunkCategory::Sn),
            "SV" => Ok(ChunkCategory::Sv),
            "SP" => Ok(ChunkCategory::Sp),
            "SAdj" => Ok(ChunkCategory::SAdj),
            "SAdv" => Ok(ChunkCategory::SAdv),
            "SujV" => Ok(ChunkCategory::SujV),
            "Pro_Obj" => Ok(ChunkCategory::ProObj),
            "CSub" => Ok(ChunkCategory::CSub),
            "Coord" => Ok(ChunkCategory::Coord),
            "Pct" => Ok(ChunkCategory::Pct),
            _ => Err(ChunkerError::invalid_config(format!(
                "unknown chunk category '{}'",
                s
            ))),
        }
    }
}

// ============================================================================
// Chunk
// ============================================================================

/// A syntactic or semantic chunk: a non-empty, category-labelled group of
/// tokens.
///
/// Tokens are kept sorted by id, so the reconstructed surface text is
/// always in linear order regardless of the order in which tokens were
/// collected. A chunk owns copies of its tokens and shares no mutable
/// state with other chunks; merging builds a new chunk rather than
/// mutating an existing one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    category: ChunkCategory,
    tokens: Vec<Token>,
}

impl Chunk {
    /// Create a chunk from a category and tokens (auto-sorted by id).
    ///
    /// # Panics
    ///
    /// Panics if `tokens` is empty: an empty chunk is a programming
    /// error, not a recoverable input condition.
    pub fn new(category: ChunkCategory, mut tokens: Vec<Token>) -> Self {
        assert!(!tokens.is_empty(), "a chunk must contain at least one token");
        tokens.sort_by_key(|t| t.id);
        Self { category, tokens }
    }

    /// Merge several chunks into one with the given result category.
    ///
    /// The token set of the result is the union of the inputs' tokens,
    /// re-sorted by id.
    pub fn merge(chunks: &[Chunk], category: ChunkCategory) -> Self {
        let tokens: Vec<Token> = chunks
            .iter()
            .flat_map(|c| c.tokens.iter().cloned())
            .collect();
        Self::new(category, tokens)
    }

    /// The category of this chunk
    pub fn category(&self) -> ChunkCategory {
        self.category
    }

    /// The tokens of this chunk, sorted by id
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens in this chunk (always ≥ 1)
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false; kept for API symmetry with collection types
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The first (lowest) token id in this chunk
    pub fn first_id(&self) -> usize {
        self.tokens[0].id
    }

    /// The first token in id order
    pub fn first_token(&self) -> &Token {
        &self.tokens[0]
    }

    /// Iterate over the token ids of this chunk, ascending
    pub fn token_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.tokens.iter().map(|t| t.id)
    }

    /// Space-separated surface text of all tokens, in id order
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&token.text);
        }
        out
    }

    /// Check if any token in this chunk carries the given POS tag
    pub fn has_upos(&self, upos: UPos) -> bool {
        self.tokens.iter().any(|t| t.upos == upos)
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.text())
    }
}

// ============================================================================
// Validation scores
// ============================================================================

/// Scores for the five constituency tests plus the aggregate.
///
/// All scores range from 0.0 (fails the test) to 1.0 (passes cleanly);
/// intermediate values mark uncertain cases.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ValidationScore {
    /// Pronominal substitution test
    pub substitution: f64,
    /// Coordination test
    pub coordination: f64,
    /// Dislocation test
    pub dislocation: f64,
    /// Cleft construction test
    pub cleft: f64,
    /// Fragment answer test
    pub fragment: f64,
    /// Weighted overall constituency score
    pub aggregate: f64,
}

/// Warning flags attached to a validated chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFlag {
    LowSubstitution,
    LowCoordination,
    LowDislocation,
    LowCleft,
    LowFragment,
    SingleToken,
    VeryLong,
    StructuralMarker,
}

impl fmt::Display for ValidationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationFlag::LowSubstitution => "low_substitution",
            ValidationFlag::LowCoordination => "low_coordination",
            ValidationFlag::LowDislocation => "low_dislocation",
            ValidationFlag::LowCleft => "low_cleft",
            ValidationFlag::LowFragment => "low_fragment",
            ValidationFlag::SingleToken => "single_token",
            ValidationFlag::VeryLong => "very_long",
            ValidationFlag::StructuralMarker => "structural_marker",
        };
        f.write_str(s)
    }
}

/// A chunk together with its constituency validation result.
///
/// The validator never alters the chunk; scores and flags are pure
/// annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedChunk {
    /// The original chunk
    pub chunk: Chunk,
    /// The five sub-scores and the aggregate
    pub score: ValidationScore,
    /// Issues noted during validation
    pub flags: Vec<ValidationFlag>,
    /// Whether the chunk met the validation threshold (structural
    /// markers always pass)
    pub passed: bool,
}

impl ValidatedChunk {
    /// Convenience accessor for the chunk's text
    pub fn text(&self) -> String {
        self.chunk.text()
    }

    /// Convenience accessor for the chunk's category
    pub fn category(&self) -> ChunkCategory {
        self.chunk.category()
    }
}
