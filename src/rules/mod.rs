//! Semantic merging rules (level 2)
//!
//! Declarative rule descriptors compile against a condition registry into
//! an ordered rule set; the merge engine applies them to a chunk sequence
//! until fixpoint (bounded). List order is priority order: at every scan
//! position the first fully matching rule wins.

pub mod conditions;
pub mod descriptor;
pub mod engine;
pub mod ruleset;

pub use conditions::{ConditionFn, ConditionRegistry};
pub use descriptor::RuleDescriptor;
pub use engine::{MergeEvent, MergeOptions, MergeOutcome, Merger};
pub use ruleset::{CompiledRule, RuleSet};
