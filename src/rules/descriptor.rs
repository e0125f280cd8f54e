//! Declarative rule descriptors
//!
//! The external rule-configuration format: an ordered JSON array of
//! descriptors, each naming a category pattern, a result category, and an
//! optional condition. The array order is the priority order.
//!
//! ```json
//! [
//!   {
//!     "rule_id": "temporal_merge",
//!     "pattern": ["SN", "SN"],
//!     "result_category": "SN",
//!     "condition": "both_temporal",
//!     "description": "Merge adjacent temporal noun phrases"
//!   }
//! ]
//! ```

use crate::errors::Result;
use crate::types::ChunkCategory;
use serde::{Deserialize, Serialize};

/// A declarative merge rule, prior to compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    /// Informational identifier, carried through to diagnostics
    #[serde(default)]
    pub rule_id: String,
    /// Category labels to match against consecutive chunks (length ≥ 1)
    pub pattern: Vec<ChunkCategory>,
    /// Category of the merged chunk
    pub result_category: ChunkCategory,
    /// Name of a registered condition; absent means unconditional
    /// adjacency merging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// Free-text documentation, ignored by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RuleDescriptor {
    /// Create a descriptor with no condition (unconditional adjacency)
    pub fn new(
        rule_id: impl Into<String>,
        pattern: Vec<ChunkCategory>,
        result_category: ChunkCategory,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            pattern,
            result_category,
            condition: None,
            description: None,
        }
    }

    /// Builder method: set the condition name
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Builder method: set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parse an ordered descriptor list from JSON
    pub fn from_json(json: &str) -> Result<Vec<RuleDescriptor>> {
        Ok(serde_json::from_str(json)?)
    }
}
