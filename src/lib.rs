//! # ud_chunker
//!
//! Rule-based two-level chunking for dependency-parsed French text.
//!
//! The library turns a parsed sentence (a Universal Dependencies tree
//! over word tokens) into a sequence of non-overlapping, category-labelled
//! chunks:
//!
//! 1. **Syntactic chunking**: tokens attached through phrase-internal
//!    relations (determiners, modifiers, auxiliaries, case markers, ...)
//!    are grouped around their phrase head.
//! 2. **Constituency validation** (optional): each chunk is scored
//!    against five structural tests; structural markers auto-pass.
//! 3. **Semantic merging**: an ordered, data-driven rule set fuses
//!    adjacent chunks (subject + verb, temporal noun phrases, ...) until
//!    no rule applies, bounded by a pass limit.
//!
//! Parsing raw text into dependency trees is out of scope: sentences
//! arrive pre-parsed (see [`conllu`] for a string-level adapter).
//!
//! ## Example
//!
//! ```rust
//! use ud_chunker::{
//!     ChunkCategory, ChunkerPipeline, ConditionRegistry, Lexicon,
//!     PipelineConfig, RuleDescriptor, RuleSet, Sentence, Token, UPos,
//! };
//!
//! let sentence = Sentence::new(
//!     "s1",
//!     "Il dort",
//!     vec![
//!         Token::new(1, "Il", "lui", UPos::Pronoun, 2, "nsubj"),
//!         Token::new(2, "dort", "dormir", UPos::Verb, 0, "root"),
//!     ],
//! )
//! .unwrap();
//!
//! let rules = RuleSet::compile(
//!     vec![RuleDescriptor::new(
//!         "subject_verb",
//!         vec![ChunkCategory::SujV, ChunkCategory::Sv],
//!         ChunkCategory::Sv,
//!     )],
//!     &ConditionRegistry::with_defaults(),
//! )
//! .unwrap();
//!
//! let pipeline =
//!     ChunkerPipeline::new(rules, Lexicon::french(), PipelineConfig::default()).unwrap();
//! let result = pipeline.process(&sentence);
//! assert_eq!(result.level2[0].to_string(), "[SV] Il dort");
//! ```

pub mod chunker;
pub mod conllu;
pub mod errors;
pub mod lexicon;
pub mod pipeline;
pub mod rules;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use chunker::UdChunker;
pub use errors::{ChunkerError, Result};
pub use lexicon::Lexicon;
pub use pipeline::{ChunkStats, ChunkerPipeline, PipelineConfig, PipelineResult};
pub use rules::{
    ConditionFn, ConditionRegistry, MergeEvent, MergeOptions, MergeOutcome, Merger,
    RuleDescriptor, RuleSet,
};
pub use types::{
    Chunk, ChunkCategory, Sentence, Token, UPos, ValidatedChunk, ValidationFlag,
    ValidationScore,
};
pub use validator::{ChunkValidator, ValidationStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
