use std::collections::HashMap;

use crate::persona::Persona;
use crate::templates::{HEALTH_TEMPLATE, LEGAL_TEMPLATE};

/// Immutable persona → system-prompt template map.
///
/// Built once at process start and shared by reference; never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct PromptCatalog {
    templates: HashMap<Persona, &'static str>,
}

impl PromptCatalog {
    pub fn new() -> Self {
        let mut templates = HashMap::new();
        templates.insert(Persona::Health, HEALTH_TEMPLATE);
        templates.insert(Persona::Legal, LEGAL_TEMPLATE);

        Self { templates }
    }

    /// Template for a persona, `None` if the catalog has no entry.
    pub fn template(&self, persona: Persona) -> Option<&'static str> {
        self.templates.get(&persona).copied()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::new()
    }
}
