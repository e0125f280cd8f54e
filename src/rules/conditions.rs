//! Named merge conditions and their registry
//!
//! A condition is a pure predicate over the exact chunk slice a rule's
//! pattern matched, with lexical lookups delegated to an injected
//! [`Lexicon`]. Conditions are selected by name from a
//! [`ConditionRegistry`]; an unregistered name is a configuration error
//! raised when the rule set is compiled, never at match time.

use crate::lexicon::Lexicon;
use crate::types::{Chunk, ChunkCategory, UPos};
use rustc_hash::FxHashMap;

/// A named condition: does this chunk slice satisfy my predicate?
pub type ConditionFn = fn(&[Chunk], &Lexicon) -> bool;

// ============================================================================
// Chunk-level predicate helpers
// ============================================================================

/// Check if a chunk contains a temporal expression: a temporal-lexicon
/// word, or a numeral (hours, dates and years are numeric).
pub fn is_temporal(chunk: &Chunk, lexicon: &Lexicon) -> bool {
    chunk.has_upos(UPos::Numeral)
        || chunk.tokens().iter().any(|t| lexicon.is_temporal(&t.text))
}

/// Check if a chunk contains a preposition, by UPOS tag or by lexical
/// lookup (tagging can differ across parsers).
pub fn has_preposition(chunk: &Chunk, lexicon: &Lexicon) -> bool {
    chunk.has_upos(UPos::Adposition)
        || chunk.tokens().iter().any(|t| lexicon.is_preposition(&t.text))
}

/// Check if a chunk's first token is a preposition
pub fn starts_with_preposition(chunk: &Chunk, lexicon: &Lexicon) -> bool {
    let first = chunk.first_token();
    first.upos == UPos::Adposition || lexicon.is_preposition(&first.text)
}

/// Check if a chunk denotes a quantity or measurement
pub fn is_quantity(chunk: &Chunk, lexicon: &Lexicon) -> bool {
    chunk.has_upos(UPos::Numeral)
        || chunk.tokens().iter().any(|t| lexicon.is_quantity_word(&t.text))
}

/// Check if a chunk's first token is a relative pronoun
pub fn starts_with_relative(chunk: &Chunk, lexicon: &Lexicon) -> bool {
    lexicon.is_relative_pronoun(&chunk.first_token().text)
}

/// Check if a chunk contains a speech/quotation verb
pub fn has_speech_verb(chunk: &Chunk, lexicon: &Lexicon) -> bool {
    chunk.tokens().iter().any(|t| lexicon.is_speech_verb(&t.lemma))
}

/// Check if a chunk is a lone comma
pub fn is_comma(chunk: &Chunk) -> bool {
    chunk.category() == ChunkCategory::Pct && chunk.text().trim() == ","
}

// ============================================================================
// Built-in conditions
// ============================================================================

fn adjacent(_slice: &[Chunk], _lexicon: &Lexicon) -> bool {
    // Pattern matching already guarantees adjacency.
    true
}

fn both_temporal(slice: &[Chunk], lexicon: &Lexicon) -> bool {
    slice.iter().all(|c| is_temporal(c, lexicon))
}

fn same_np_structure(slice: &[Chunk], _lexicon: &Lexicon) -> bool {
    slice.iter().all(|c| c.category() == ChunkCategory::Sn)
}

fn title_followed_by_propn(slice: &[Chunk], lexicon: &Lexicon) -> bool {
    if slice.len() < 2 {
        return false;
    }
    let first_has_title = slice[0].tokens().iter().any(|t| lexicon.is_title(&t.text));
    let second_has_propn = slice[1].has_upos(UPos::ProperNoun);
    first_has_title && second_has_propn
}

fn both_have_preposition(slice: &[Chunk], lexicon: &Lexicon) -> bool {
    slice.iter().all(|c| has_preposition(c, lexicon))
}

fn first_is_quantity_second_has_prep(slice: &[Chunk], lexicon: &Lexicon) -> bool {
    if slice.len() < 2 {
        return false;
    }
    is_quantity(&slice[0], lexicon) && has_preposition(&slice[1], lexicon)
}

fn sv_starts_with_relative(slice: &[Chunk], lexicon: &Lexicon) -> bool {
    slice
        .iter()
        .find(|c| c.category() == ChunkCategory::Sv)
        .is_some_and(|c| starts_with_relative(c, lexicon))
}

fn is_speech_verb(slice: &[Chunk], lexicon: &Lexicon) -> bool {
    slice.iter().any(|c| has_speech_verb(c, lexicon))
}

fn pct_is_comma(slice: &[Chunk], _lexicon: &Lexicon) -> bool {
    slice.iter().any(is_comma)
}

fn adjacent_no_punctuation(slice: &[Chunk], _lexicon: &Lexicon) -> bool {
    !slice.iter().any(|c| c.category() == ChunkCategory::Pct)
}

fn first_is_adverbial_and_comma(slice: &[Chunk], lexicon: &Lexicon) -> bool {
    if slice.len() < 2 {
        return false;
    }
    has_preposition(&slice[0], lexicon) && is_comma(&slice[1])
}

// ============================================================================
// Registry
// ============================================================================

/// Static name → condition table.
///
/// Compiled rule sets resolve condition names here exactly once, at build
/// time. Callers can extend the table with [`register`](Self::register)
/// before compiling.
#[derive(Debug, Clone)]
pub struct ConditionRegistry {
    table: FxHashMap<String, ConditionFn>,
}

impl ConditionRegistry {
    /// An empty registry with no conditions
    pub fn empty() -> Self {
        Self {
            table: FxHashMap::default(),
        }
    }

    /// A registry pre-populated with the built-in conditions
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register("adjacent", adjacent);
        registry.register("both_temporal", both_temporal);
        registry.register("same_np_structure", same_np_structure);
        registry.register("title_followed_by_propn", title_followed_by_propn);
        registry.register("both_have_preposition", both_have_preposition);
        registry.register(
            "first_is_quantity_second_has_prep",
            first_is_quantity_second_has_prep,
        );
        registry.register("sv_starts_with_relative", sv_starts_with_relative);
        registry.register("is_speech_verb", is_speech_verb);
        registry.register("pct_is_comma", pct_is_comma);
        registry.register("adjacent_no_punctuation", adjacent_no_punctuation);
        registry.register(
            "first_is_adverbial_and_comma",
            first_is_adverbial_and_comma,
        );
        registry
    }

    /// Register a condition under a name, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, func: ConditionFn) {
        self.table.insert(name.into(), func);
    }

    /// Look up a condition by name
    pub fn get(&self, name: &str) -> Option<ConditionFn> {
        self.table.get(name).copied()
    }

    /// Registered condition names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.table.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Token;

    fn tok(id: usize, text: &str, lemma: &str, upos: UPos) -> Token {
        Token::new(id, text, lemma, upos, 0, "root")
    }

    fn lex() -> Lexicon {
        Lexicon::french()
    }

    #[test]
    fn test_has_preposition() {
        let chunk = Chunk::new(
            ChunkCategory::Sp,
            vec![
                tok(1, "à", "à", UPos::Adposition),
                tok(2, "Paris", "Paris", UPos::ProperNoun),
            ],
        );
        assert!(has_preposition(&chunk, &lex()));

        let chunk = Chunk::new(
            ChunkCategory::Sn,
            vec![
                tok(1, "le", "le", UPos::Determiner),
                tok(2, "docteur", "docteur", UPos::Noun),
            ],
        );
        assert!(!has_preposition(&chunk, &lex()));
    }

    #[test]
    fn test_has_preposition_by_text_fallback() {
        // Mis-tagged preposition still found via the lexicon.
        let chunk = Chunk::new(ChunkCategory::Sn, vec![tok(1, "avec", "avec", UPos::Other)]);
        assert!(has_preposition(&chunk, &lex()));
    }

    #[test]
    fn test_starts_with_preposition() {
        let chunk = Chunk::new(
            ChunkCategory::Sp,
            vec![
                tok(1, "à", "à", UPos::Adposition),
                tok(2, "Paris", "Paris", UPos::ProperNoun),
            ],
        );
        assert!(starts_with_preposition(&chunk, &lex()));

        let chunk = Chunk::new(
            ChunkCategory::Sp,
            vec![
                tok(1, "Paris", "Paris", UPos::ProperNoun),
                tok(2, "de", "de", UPos::Adposition),
            ],
        );
        assert!(!starts_with_preposition(&chunk, &lex()));
    }

    #[test]
    fn test_is_quantity() {
        let chunk = Chunk::new(
            ChunkCategory::Sn,
            vec![
                tok(1, "75", "75", UPos::Numeral),
                tok(2, "kilos", "kilo", UPos::Noun),
            ],
        );
        assert!(is_quantity(&chunk, &lex()));

        let chunk = Chunk::new(
            ChunkCategory::Sn,
            vec![
                tok(1, "le", "le", UPos::Determiner),
                tok(2, "docteur", "docteur", UPos::Noun),
            ],
        );
        assert!(!is_quantity(&chunk, &lex()));
    }

    #[test]
    fn test_starts_with_relative() {
        let chunk = Chunk::new(
            ChunkCategory::Sv,
            vec![
                tok(1, "qui", "qui", UPos::Pronoun),
                tok(2, "est", "être", UPos::Aux),
            ],
        );
        assert!(starts_with_relative(&chunk, &lex()));

        let chunk = Chunk::new(ChunkCategory::SujV, vec![tok(1, "il", "il", UPos::Pronoun)]);
        assert!(!starts_with_relative(&chunk, &lex()));
    }

    #[test]
    fn test_has_speech_verb() {
        let chunk = Chunk::new(
            ChunkCategory::Sv,
            vec![tok(1, "confie", "confier", UPos::Verb)],
        );
        assert!(has_speech_verb(&chunk, &lex()));

        let chunk = Chunk::new(
            ChunkCategory::Sv,
            vec![tok(1, "marche", "marcher", UPos::Verb)],
        );
        assert!(!has_speech_verb(&chunk, &lex()));
    }

    #[test]
    fn test_is_comma() {
        let comma = Chunk::new(ChunkCategory::Pct, vec![tok(1, ",", ",", UPos::Punctuation)]);
        assert!(is_comma(&comma));

        let period = Chunk::new(ChunkCategory::Pct, vec![tok(1, ".", ".", UPos::Punctuation)]);
        assert!(!is_comma(&period));
    }

    #[test]
    fn test_both_temporal() {
        let time = Chunk::new(
            ChunkCategory::Sn,
            vec![
                tok(1, "18", "18", UPos::Numeral),
                tok(2, "h", "h", UPos::Noun),
                tok(3, "30", "30", UPos::Numeral),
            ],
        );
        let day = Chunk::new(
            ChunkCategory::Sn,
            vec![
                tok(4, "ce", "ce", UPos::Determiner),
                tok(5, "lundi", "lundi", UPos::Noun),
            ],
        );
        let cat = Chunk::new(
            ChunkCategory::Sn,
            vec![
                tok(6, "le", "le", UPos::Determiner),
                tok(7, "chat", "chat", UPos::Noun),
            ],
        );

        assert!(both_temporal(&[time.clone(), day], &lex()));
        assert!(!both_temporal(&[time, cat], &lex()));
    }

    #[test]
    fn test_both_have_preposition() {
        let pp1 = Chunk::new(
            ChunkCategory::Sp,
            vec![
                tok(1, "à", "à", UPos::Adposition),
                tok(2, "Paris", "Paris", UPos::ProperNoun),
            ],
        );
        let pp2 = Chunk::new(
            ChunkCategory::Sp,
            vec![
                tok(3, "de", "de", UPos::Adposition),
                tok(4, "Lyon", "Lyon", UPos::ProperNoun),
            ],
        );
        let np = Chunk::new(
            ChunkCategory::Sn,
            vec![
                tok(5, "le", "le", UPos::Determiner),
                tok(6, "chat", "chat", UPos::Noun),
            ],
        );

        assert!(both_have_preposition(&[pp1.clone(), pp2], &lex()));
        assert!(!both_have_preposition(&[pp1, np], &lex()));
    }

    #[test]
    fn test_title_followed_by_propn() {
        let title = Chunk::new(
            ChunkCategory::Sn,
            vec![
                tok(1, "le", "le", UPos::Determiner),
                tok(2, "docteur", "docteur", UPos::Noun),
            ],
        );
        let name = Chunk::new(
            ChunkCategory::Sn,
            vec![tok(3, "Moulin", "Moulin", UPos::ProperNoun)],
        );

        assert!(title_followed_by_propn(&[title.clone(), name], &lex()));

        let np = Chunk::new(ChunkCategory::Sn, vec![tok(3, "chat", "chat", UPos::Noun)]);
        assert!(!title_followed_by_propn(&[title, np], &lex()));
    }

    #[test]
    fn test_adjacent_no_punctuation() {
        let np = Chunk::new(ChunkCategory::Sn, vec![tok(1, "chat", "chat", UPos::Noun)]);
        let comma = Chunk::new(ChunkCategory::Pct, vec![tok(2, ",", ",", UPos::Punctuation)]);

        assert!(adjacent_no_punctuation(&[np.clone(), np.clone()], &lex()));
        assert!(!adjacent_no_punctuation(&[np, comma], &lex()));
    }

    #[test]
    fn test_sv_starts_with_relative() {
        let sv = Chunk::new(
            ChunkCategory::Sv,
            vec![
                tok(2, "qui", "qui", UPos::Pronoun),
                tok(3, "dort", "dormir", UPos::Verb),
            ],
        );
        let np = Chunk::new(ChunkCategory::Sn, vec![tok(1, "chat", "chat", UPos::Noun)]);

        assert!(sv_starts_with_relative(&[np.clone(), sv], &lex()));

        let plain_sv = Chunk::new(ChunkCategory::Sv, vec![tok(2, "dort", "dormir", UPos::Verb)]);
        assert!(!sv_starts_with_relative(&[np.clone(), plain_sv], &lex()));
        // No SV chunk in the slice at all
        assert!(!sv_starts_with_relative(&[np.clone(), np], &lex()));
    }

    #[test]
    fn test_first_is_adverbial_and_comma() {
        let pp = Chunk::new(
            ChunkCategory::Sn,
            vec![
                tok(1, "De", "de", UPos::Adposition),
                tok(2, "retour", "retour", UPos::Noun),
            ],
        );
        let comma = Chunk::new(ChunkCategory::Pct, vec![tok(3, ",", ",", UPos::Punctuation)]);
        let np = Chunk::new(ChunkCategory::Sn, vec![tok(3, "chat", "chat", UPos::Noun)]);

        assert!(first_is_adverbial_and_comma(&[pp.clone(), comma], &lex()));
        assert!(!first_is_adverbial_and_comma(&[pp, np], &lex()));
    }

    #[test]
    fn test_registry_defaults() {
        let registry = ConditionRegistry::with_defaults();
        assert!(registry.get("adjacent").is_some());
        assert!(registry.get("both_temporal").is_some());
        assert!(registry.get("first_is_adverbial_and_comma").is_some());
        assert!(registry.get("no_such_condition").is_none());
        assert_eq!(registry.names().len(), 11);
    }

    #[test]
    fn test_registry_extension() {
        fn never(_slice: &[Chunk], _lexicon: &Lexicon) -> bool {
            false
        }

        let mut registry = ConditionRegistry::with_defaults();
        registry.register("never", never);
        let func = registry.get("never").unwrap();

        let np = Chunk::new(ChunkCategory::Sn, vec![tok(1, "chat", "chat", UPos::Noun)]);
        assert!(!func(&[np], &lex()));
    }
}
