//! Dependency-tree phrase chunking (level 1)
//!
//! Groups the tokens of a parsed sentence into minimal grammatical
//! phrases by walking phrase-internal attachment relations upward to a
//! phrase head. Every token lands in exactly one chunk; punctuation
//! tokens each form their own chunk.

use crate::types::{Chunk, ChunkCategory, Sentence, Token, UPos};
use rustc_hash::{FxHashMap, FxHashSet};

/// Base dependency relations whose dependent belongs to its head's phrase:
/// noun-phrase internals, multi-word expressions, verb auxiliaries,
/// case markers, and appositions.
const PHRASE_INTERNAL: &[&str] = &[
    "det", "amod", "nummod", "nmod", "flat", "fixed", "compound", "aux", "case", "appos",
];

/// Relations whose dependent is always its own phrase head. Copulas link
/// to predicates and must not be absorbed into nominal phrases.
const PHRASE_EXTERNAL: &[&str] = &["cop"];

fn is_phrase_internal(base_deprel: &str) -> bool {
    PHRASE_INTERNAL.contains(&base_deprel)
}

fn is_phrase_external(base_deprel: &str) -> bool {
    PHRASE_EXTERNAL.contains(&base_deprel)
}

/// Universal Dependencies-based phrase chunker.
///
/// The phrase-internal relation set and the category mapping are fixed;
/// the chunker itself carries no configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct UdChunker;

impl UdChunker {
    /// Create a new chunker
    pub fn new() -> Self {
        Self
    }

    /// Chunk a sentence into phrases.
    ///
    /// Returns chunks in linear order (by first token id), covering every
    /// token of the sentence exactly once. Malformed head data (a head id
    /// that does not exist, or a head chain that cycles) never aborts
    /// chunking: the affected token simply becomes its own phrase head.
    pub fn chunk(&self, sentence: &Sentence) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        // Resolve each non-punctuation token to its phrase head.
        let mut head_of: FxHashMap<usize, usize> =
            FxHashMap::with_capacity_and_hasher(sentence.len(), Default::default());
        for token in sentence.tokens() {
            if !token.is_punctuation() {
                head_of.insert(token.id, self.phrase_head(sentence, token));
            }
        }

        // Group tokens by phrase head, in first-seen sentence order.
        let mut order: Vec<usize> = Vec::new();
        let mut groups: FxHashMap<usize, Vec<Token>> = FxHashMap::default();
        for token in sentence.tokens() {
            if token.is_punctuation() {
                chunks.push(Chunk::new(ChunkCategory::Pct, vec![token.clone()]));
                continue;
            }
            let head_id = head_of[&token.id];
            groups
                .entry(head_id)
                .or_insert_with(|| {
                    order.push(head_id);
                    Vec::new()
                })
                .push(token.clone());
        }

        // One chunk per phrase head; the category comes from the head token.
        for head_id in order {
            let tokens = groups.remove(&head_id).expect("group exists for head");
            let head_token = sentence
                .token(head_id)
                .expect("phrase head resolves to a sentence token");
            chunks.push(Chunk::new(Self::categorize(head_token), tokens));
        }

        chunks.sort_by_key(|c| c.first_id());
        chunks
    }

    /// Find the phrase head for a token by following phrase-internal
    /// relations upward.
    ///
    /// The walk is iterative and bounded by sentence length; a visited
    /// set detects cyclic head data, in which case the token becomes its
    /// own phrase head. A head id that is not in the sentence stops the
    /// walk at the current token (root attachment).
    fn phrase_head(&self, sentence: &Sentence, start: &Token) -> usize {
        let mut current = start;
        let mut visited: FxHashSet<usize> = FxHashSet::default();

        for _ in 0..=sentence.len() {
            let base = current.base_deprel();
            if is_phrase_external(base) || !is_phrase_internal(base) || current.is_root() {
                return current.id;
            }
            if !visited.insert(current.id) {
                // cycle in head data
                return start.id;
            }
            match sentence.token(current.head) {
                Some(parent) => current = parent,
                // head references a non-existent token id
                None => return current.id,
            }
        }

        start.id
    }

    /// Map a phrase-head token to its chunk category.
    ///
    /// This is the fixed UPOS/deprel → category table; it is not
    /// configurable per instance. Pronouns split on their grammatical
    /// function (subject vs object); anything unrecognized falls back to
    /// the nominal category.
    pub fn categorize(token: &Token) -> ChunkCategory {
        match token.upos {
            UPos::Pronoun => match token.base_deprel() {
                "obj" | "iobj" | "obl" | "expl" => ChunkCategory::ProObj,
                _ => ChunkCategory::SujV,
            },
            UPos::Verb | UPos::Aux => ChunkCategory::Sv,
            UPos::Noun | UPos::ProperNoun | UPos::Numeral | UPos::Determiner => ChunkCategory::Sn,
            UPos::Adposition => ChunkCategory::Sp,
            UPos::Adjective => ChunkCategory::SAdj,
            UPos::Adverb => ChunkCategory::SAdv,
            UPos::SubConj => ChunkCategory::CSub,
            UPos::CoordConj => ChunkCategory::Coord,
            UPos::Punctuation => ChunkCategory::Pct,
            _ => ChunkCategory::Sn,
        }
    }
}
