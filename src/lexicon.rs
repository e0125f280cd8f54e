//! Lexical indicator sets
//!
//! Named word sets referenced by merge conditions and by the constituency
//! validator: temporal expressions, prepositions, relative pronouns,
//! speech verbs, quantity words, titles, and the two preposition classes
//! relevant to pronominal resumption (`y` / `en`).
//!
//! A `Lexicon` is an explicitly constructed, immutable resource passed
//! into the validator and condition functions, never ambient state. The
//! built-in French instance ([`Lexicon::french`]) covers the default
//! pipeline; custom data deserializes from a name → word-list mapping.

use crate::errors::Result;
use rustc_hash::FxHashSet;
use serde::Deserialize;

/// Immutable word-set resource for condition and validator lookups.
///
/// All lookups are lowercase-exact: the probe word is lowercased, set
/// entries are stored as given.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    temporal: FxHashSet<String>,
    prepositions: FxHashSet<String>,
    relative_pronouns: FxHashSet<String>,
    speech_verbs: FxHashSet<String>,
    quantity: FxHashSet<String>,
    titles: FxHashSet<String>,
    prepositions_to_y: FxHashSet<String>,
    prepositions_to_en: FxHashSet<String>,
}

fn word_set(words: &[&str]) -> FxHashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Lexicon {
    /// The built-in French lexicon used by the default pipeline.
    pub fn french() -> Self {
        Self {
            temporal: word_set(&[
                // time units
                "h", "heure", "heures", "minute", "minutes", "seconde", "secondes",
                // parts of day
                "matin", "midi", "après-midi", "soir", "nuit", "minuit",
                // days of week
                "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
                "jour", "jours", "journée",
                // months
                "janvier", "février", "mars", "avril", "mai", "juin", "juillet",
                "août", "septembre", "octobre", "novembre", "décembre",
                // time periods
                "mois", "an", "ans", "année", "années", "semaine", "semaines",
                // temporal references
                "hier", "aujourd'hui", "demain", "maintenant", "ce", "cette",
                "dernier", "dernière", "prochain", "prochaine",
            ]),
            prepositions: word_set(&[
                "à", "de", "en", "dans", "sur", "sous", "pour", "par", "avec",
                "sans", "chez", "vers", "contre", "depuis", "pendant", "avant",
                "après", "devant", "derrière", "entre", "parmi", "selon",
            ]),
            relative_pronouns: word_set(&[
                "qui", "que", "qu'", "dont", "où", "lequel", "laquelle",
                "lesquels", "lesquelles", "auquel", "duquel", "auxquels",
            ]),
            speech_verbs: word_set(&[
                "dire", "confier", "rappeler", "poursuivre", "ajouter", "conclure",
                "affirmer", "déclarer", "expliquer", "raconter", "répondre",
                "demander", "interroger", "préciser",
            ]),
            quantity: word_set(&[
                "kilo", "kilos", "gramme", "grammes", "litre", "litres",
                "mètre", "mètres", "centimètre", "kilomètre",
                "heure", "heures", "minute", "minutes", "jour", "jours",
            ]),
            titles: word_set(&[
                "docteur", "professeur", "monsieur", "madame", "mademoiselle",
            ]),
            prepositions_to_y: word_set(&["à", "dans", "sur", "sous", "chez", "vers"]),
            prepositions_to_en: word_set(&["de", "des", "du"]),
        }
    }

    /// Deserialize a lexicon from a JSON name → word-list mapping.
    /// Missing sets default to empty.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check if a word is a temporal expression
    pub fn is_temporal(&self, word: &str) -> bool {
        self.temporal.contains(&word.to_lowercase())
    }

    /// Check if a word is a preposition
    pub fn is_preposition(&self, word: &str) -> bool {
        self.prepositions.contains(&word.to_lowercase())
    }

    /// Check if a word is a relative pronoun
    pub fn is_relative_pronoun(&self, word: &str) -> bool {
        self.relative_pronouns.contains(&word.to_lowercase())
    }

    /// Check if a lemma is a speech/quotation verb
    pub fn is_speech_verb(&self, lemma: &str) -> bool {
        self.speech_verbs.contains(&lemma.to_lowercase())
    }

    /// Check if a word denotes a quantity or measurement unit
    pub fn is_quantity_word(&self, word: &str) -> bool {
        self.quantity.contains(&word.to_lowercase())
    }

    /// Check if a word is a title (docteur, madame, ...)
    pub fn is_title(&self, word: &str) -> bool {
        self.titles.contains(&word.to_lowercase())
    }

    /// Check if a preposition lemma licenses resumption with `y`
    pub fn preposition_takes_y(&self, lemma: &str) -> bool {
        self.prepositions_to_y.contains(&lemma.to_lowercase())
    }

    /// Check if a preposition lemma licenses resumption with `en`
    pub fn preposition_takes_en(&self, lemma: &str) -> bool {
        self.prepositions_to_en.contains(&lemma.to_lowercase())
    }
}
