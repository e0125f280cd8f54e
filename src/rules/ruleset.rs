//! Rule-set compilation
//!
//! Turns an ordered list of [`RuleDescriptor`]s into executable
//! [`CompiledRule`]s, resolving condition names against a
//! [`ConditionRegistry`]. Compilation is fail-fast: an empty pattern or an
//! unknown condition name rejects the whole rule set before any sentence
//! is processed. A descriptor with *no* condition compiles to an
//! unconditional adjacency rule; absence and unknown are distinct.

use crate::errors::{ChunkerError, Result};
use crate::lexicon::Lexicon;
use crate::rules::conditions::{ConditionFn, ConditionRegistry};
use crate::rules::descriptor::RuleDescriptor;
use crate::types::{Chunk, ChunkCategory};

/// A condition resolved from the registry, keeping its name for
/// diagnostics.
#[derive(Debug, Clone)]
struct NamedCondition {
    name: String,
    func: ConditionFn,
}

/// An executable merge rule.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    rule_id: String,
    pattern: Vec<ChunkCategory>,
    result_category: ChunkCategory,
    condition: Option<NamedCondition>,
}

impl CompiledRule {
    /// The rule's informational identifier
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// The category pattern this rule matches
    pub fn pattern(&self) -> &[ChunkCategory] {
        &self.pattern
    }

    /// The category assigned to the merged chunk
    pub fn result_category(&self) -> ChunkCategory {
        self.result_category
    }

    /// The resolved condition name, if the rule has one
    pub fn condition_name(&self) -> Option<&str> {
        self.condition.as_ref().map(|c| c.name.as_str())
    }

    /// Check if a chunk slice matches this rule's pattern element-wise.
    /// The slice length must equal the pattern length.
    pub fn matches(&self, slice: &[Chunk]) -> bool {
        slice.len() == self.pattern.len()
            && self
                .pattern
                .iter()
                .zip(slice)
                .all(|(expected, chunk)| chunk.category() == *expected)
    }

    /// Evaluate this rule's condition on a matched slice. Rules without a
    /// condition always hold.
    pub fn condition_holds(&self, slice: &[Chunk], lexicon: &Lexicon) -> bool {
        match &self.condition {
            Some(condition) => (condition.func)(slice, lexicon),
            None => true,
        }
    }
}

/// An ordered, compiled rule list. Order is priority: the merge engine
/// tests rules first to last and the first full match wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile descriptors against a condition registry, preserving order.
    pub fn compile(
        descriptors: Vec<RuleDescriptor>,
        registry: &ConditionRegistry,
    ) -> Result<Self> {
        let mut rules = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            if descriptor.pattern.is_empty() {
                return Err(ChunkerError::invalid_rule(
                    descriptor.rule_id,
                    "pattern must contain at least one category",
                ));
            }

            let condition = match descriptor.condition {
                Some(name) => {
                    let func = registry.get(&name).ok_or_else(|| {
                        ChunkerError::unknown_condition(name.clone(), descriptor.rule_id.clone())
                    })?;
                    Some(NamedCondition { name, func })
                }
                None => None,
            };

            rules.push(CompiledRule {
                rule_id: descriptor.rule_id,
                pattern: descriptor.pattern,
                result_category: descriptor.result_category,
                condition,
            });
        }

        Ok(Self { rules })
    }

    /// Parse a JSON descriptor array and compile it in one step.
    pub fn from_json(json: &str, registry: &ConditionRegistry) -> Result<Self> {
        Self::compile(RuleDescriptor::from_json(json)?, registry)
    }

    /// The compiled rules, in priority order
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the rule set is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate rules in priority order
    pub fn iter(&self) -> std::slice::Iter<'_, CompiledRule> {
        self.rules.iter()
    }
}
