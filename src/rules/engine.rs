//! The merge engine (semantic merger)
//!
//! Applies a compiled rule set to a chunk sequence. A single pass scans
//! left to right, testing rules in priority order at each position; a
//! match replaces the matched chunks with one merged chunk and the scan
//! continues after it. Multi-pass mode repeats full passes until a pass
//! produces no merges or the pass bound is reached.
//!
//! Each pass builds the next sequence from the current one; the sequence
//! being scanned is never mutated, so behavior is independent of storage
//! details and deterministic by construction.

use crate::lexicon::Lexicon;
use crate::rules::ruleset::RuleSet;
use crate::types::Chunk;
use serde::Serialize;
use std::sync::Arc;

/// Default bound on multi-pass iteration
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Options controlling merge iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeOptions {
    /// Repeat passes until convergence (bounded by `max_passes`)
    pub multi_pass: bool,
    /// Hard bound on the number of passes. This is the sole anti-runaway
    /// guard against pathological rule sets; reaching it is a normal,
    /// reportable stop condition, not an error.
    pub max_passes: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            multi_pass: false,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl MergeOptions {
    /// Single-pass options (the default)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable multi-pass iteration
    pub fn multi_pass(mut self) -> Self {
        self.multi_pass = true;
        self
    }

    /// Builder method: set the pass bound
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }
}

/// One applied rule, recorded when a diagnostics sink is supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeEvent {
    /// Pass number, 1-based
    pub pass: usize,
    /// Scan position of the match within that pass's input sequence
    pub position: usize,
    /// Identifier of the rule that fired
    pub rule_id: String,
    /// Rendered chunks consumed by the merge
    pub consumed: Vec<String>,
    /// Rendered merged chunk
    pub produced: String,
}

/// Result of a merge run.
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    /// The merged chunk sequence, a re-partition of the input's tokens
    pub chunks: Vec<Chunk>,
    /// Number of passes executed (≥ 1)
    pub passes: usize,
    /// Total merges applied across all passes
    pub total_merges: usize,
    /// True iff the final pass produced zero merges, i.e. the output is a
    /// fixpoint of the rule set. False when iteration stopped at the pass
    /// bound (or after a single pass that still merged something).
    pub converged: bool,
}

/// Applies semantic merge rules to chunk sequences.
///
/// Holds only immutable state (rule set and lexicon); a single merger may
/// be shared freely across threads and sentences.
#[derive(Debug, Clone)]
pub struct Merger {
    rules: RuleSet,
    lexicon: Arc<Lexicon>,
}

impl Merger {
    /// Create a merger from a compiled rule set and a lexicon
    pub fn new(rules: RuleSet, lexicon: Arc<Lexicon>) -> Self {
        Self { rules, lexicon }
    }

    /// The compiled rule set
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Merge a chunk sequence.
    ///
    /// Equivalent to [`merge_into`](Self::merge_into) with no diagnostics
    /// sink.
    pub fn merge(&self, chunks: &[Chunk], options: &MergeOptions) -> MergeOutcome {
        self.merge_into(chunks, options, None)
    }

    /// Merge a chunk sequence, optionally recording a [`MergeEvent`] for
    /// every applied rule.
    ///
    /// With `events` set to `None` this is identical to
    /// [`merge`](Self::merge) with zero overhead.
    pub fn merge_into(
        &self,
        chunks: &[Chunk],
        options: &MergeOptions,
        mut events: Option<&mut Vec<MergeEvent>>,
    ) -> MergeOutcome {
        let mut current: Vec<Chunk> = chunks.to_vec();

        if self.rules.is_empty() {
            return MergeOutcome {
                chunks: current,
                passes: 0,
                total_merges: 0,
                converged: true,
            };
        }

        let mut passes = 0;
        let mut total_merges = 0;
        let converged = loop {
            passes += 1;
            let (next, merges) = self.single_pass(&current, passes, events.as_deref_mut());
            current = next;
            total_merges += merges;

            if merges == 0 {
                break true;
            }
            if !options.multi_pass || passes >= options.max_passes {
                break false;
            }
        };

        MergeOutcome {
            chunks: current,
            passes,
            total_merges,
            converged,
        }
    }

    /// One left-to-right scan, building the next sequence from `chunks`.
    fn single_pass(
        &self,
        chunks: &[Chunk],
        pass: usize,
        mut events: Option<&mut Vec<MergeEvent>>,
    ) -> (Vec<Chunk>, usize) {
        let mut next = Vec::with_capacity(chunks.len());
        let mut merges = 0;
        let mut i = 0;

        while i < chunks.len() {
            // Rules in declaration order; first full match wins. This
            // settles every tie, including rules of different pattern
            // lengths matching at the same position.
            let fired = self.rules.iter().find(|rule| {
                let len = rule.pattern().len();
                i + len <= chunks.len() && {
                    let slice = &chunks[i..i + len];
                    rule.matches(slice) && rule.condition_holds(slice, &self.lexicon)
                }
            });

            match fired {
                Some(rule) => {
                    let len = rule.pattern().len();
                    let slice = &chunks[i..i + len];
                    let merged = Chunk::merge(slice, rule.result_category());

                    if let Some(sink) = events.as_deref_mut() {
                        sink.push(MergeEvent {
                            pass,
                            position: i,
                            rule_id: rule.rule_id().to_string(),
                            consumed: slice.iter().map(Chunk::to_string).collect(),
                            produced: merged.to_string(),
                        });
                    }

                    next.push(merged);
                    merges += 1;
                    // Advance past the produced chunk: it is never
                    // re-matched within the pass that created it.
                    i += len;
                }
                None => {
                    next.push(chunks[i].clone());
                    i += 1;
                }
            }
        }

        (next, merges)
    }
}
