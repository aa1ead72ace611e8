//! Category-to-responder routing.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::conversation::Category;

use super::responder::Responder;

/// Maps routing categories to responders.
///
/// Routing is total: a category with no registered responder resolves to
/// the default responder, so dispatch can never dead-end.
pub struct ResponderTable {
    entries: HashMap<Category, Arc<dyn Responder>>,
    default_responder: Arc<dyn Responder>,
}

impl ResponderTable {
    /// Creates a table where every category initially routes to
    /// `default_responder`.
    pub fn new(default_responder: Arc<dyn Responder>) -> Self {
        Self {
            entries: HashMap::new(),
            default_responder,
        }
    }

    /// Registers a responder for a category.
    pub fn with(mut self, category: Category, responder: Arc<dyn Responder>) -> Self {
        self.entries.insert(category, responder);
        self
    }

    /// The responder for a category, or the default when none is registered.
    pub fn route(&self, category: Category) -> Arc<dyn Responder> {
        self.entries
            .get(&category)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.default_responder))
    }
}
