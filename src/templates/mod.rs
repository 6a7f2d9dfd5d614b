//! Project templates for `alice create`

use std::collections::BTreeMap;

use crate::core::config::TemplatesConfig;
use crate::core::{AliceError, AliceResult};

/// Template manager
pub struct TemplateManager {
    /// Lowercase language tag -> repository to clone
    sources: BTreeMap<String, String>,
}

impl TemplateManager {
    /// Create a template manager from configuration
    pub fn new(config: &TemplatesConfig) -> Self {
        Self {
            sources: config
                .sources
                .iter()
                .map(|(tag, source)| (tag.to_lowercase(), source.clone()))
                .collect(),
        }
    }

    /// Resolve a language tag (case-insensitive) to its template repository
    pub fn resolve(&self, language: &str) -> AliceResult<&str> {
        match self.sources.get(&language.to_lowercase()) {
            Some(source) if !source.is_empty() => Ok(source),
            _ => Err(AliceError::InvalidLanguage(language.to_string())),
        }
    }
}

impl Default for TemplateManager {
    fn default() -> Self {
        Self::new(&TemplatesConfig::default())
    }
}
