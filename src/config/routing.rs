//! Turn routing configuration

use serde::Deserialize;

use crate::domain::conversation::Category;

/// Turn routing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// Category used when classification fails
    #[serde(default = "default_category")]
    pub default_category: Category,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
        }
    }
}

fn default_category() -> Category {
    Category::OperatorSupport
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_route_is_operator_support() {
        assert_eq!(
            RoutingConfig::default().default_category,
            Category::OperatorSupport
        );
    }

    #[test]
    fn deserializes_wire_names() {
        let config: RoutingConfig =
            serde_json::from_str(r#"{"default_category": "cognitive_support"}"#).unwrap();
        assert_eq!(config.default_category, Category::CognitiveSupport);
    }
}
