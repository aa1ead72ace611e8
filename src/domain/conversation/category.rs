//! Routing categories produced by the intent classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of routing labels.
///
/// Every classifier output resolves to a member of this set; the default
/// member used on classification failure is configuration
/// ([`RoutingConfig`](crate::config::RoutingConfig)), not hardcoded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Questions about operating the map editor UI.
    OperatorSupport,
    /// Conceptual guidance grounded in the reference article.
    CognitiveSupport,
    /// Rubric-based structured grading of the map.
    Scoring,
}

impl Category {
    /// All members, in routing-table order.
    pub const ALL: [Category; 3] = [
        Category::OperatorSupport,
        Category::CognitiveSupport,
        Category::Scoring,
    ];

    /// The wire name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::OperatorSupport => "operator_support",
            Category::CognitiveSupport => "cognitive_support",
            Category::Scoring => "scoring",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operator_support" => Ok(Category::OperatorSupport),
            "cognitive_support" => Ok(Category::CognitiveSupport),
            "scoring" => Ok(Category::Scoring),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// A label outside the closed category set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// The classifier's result for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// The routing label; always a valid [`Category`].
    pub category: Category,
    /// The model's reasoning, or the failure reason when the classifier
    /// fell back to the default category.
    pub rationale: String,
}

impl Classification {
    /// Creates a new classification.
    pub fn new(category: Category, rationale: impl Into<String>) -> Self {
        Self {
            category,
            rationale: rationale.into(),
        }
    }
}
