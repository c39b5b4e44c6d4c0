mod builtin;

use crate::models::{Cluster, Statement};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Canned topic material for one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainBundle {
    pub key: String,
    pub title: String,
    pub description: String,
    pub main_theme: String,
    pub statements: Vec<Statement>,
    pub clusters: Vec<Cluster>,
}

/// Substrings that route free-text issues to a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    pub domain: String,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn matches(&self, lowered_text: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered_text.contains(keyword.as_str()))
    }
}

/// All static tables the topic generator reads. Built once at startup and
/// shared read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainCatalog {
    domains: Vec<DomainBundle>,
    /// External-facing domain names to catalog keys.
    aliases: HashMap<String, String>,
    /// Checked in order; the first matching rule wins.
    keyword_rules: Vec<KeywordRule>,
    default_domain: String,
    guidance: HashMap<String, String>,
    default_guidance: String,
}

impl DomainCatalog {
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let catalog: DomainCatalog = serde_json::from_str(&raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.domains.is_empty() {
            return Err(CatalogError::Invalid("no domains defined".into()));
        }
        if !self.contains(&self.default_domain) {
            return Err(CatalogError::Invalid(format!(
                "default domain '{}' is not in the catalog",
                self.default_domain
            )));
        }
        for (index, bundle) in self.domains.iter().enumerate() {
            if self.domains[..index].iter().any(|other| other.key == bundle.key) {
                return Err(CatalogError::Invalid(format!("duplicate domain '{}'", bundle.key)));
            }
        }
        for rule in &self.keyword_rules {
            if !self.contains(&rule.domain) {
                return Err(CatalogError::Invalid(format!(
                    "keyword rule targets unknown domain '{}'",
                    rule.domain
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&DomainBundle> {
        self.domains.iter().find(|bundle| bundle.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Domain keys in catalog order.
    pub fn keys(&self) -> Vec<&str> {
        self.domains.iter().map(|bundle| bundle.key.as_str()).collect()
    }

    /// Unrecognized names pass through unchanged.
    pub fn alias<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn keyword_rules(&self) -> &[KeywordRule] {
        &self.keyword_rules
    }

    pub fn default_domain(&self) -> &str {
        &self.default_domain
    }

    pub fn guidance_for(&self, key: &str) -> &str {
        self.guidance
            .get(key)
            .map(String::as_str)
            .unwrap_or(&self.default_guidance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = DomainCatalog::builtin();
        catalog.validate().unwrap();
        assert_eq!(catalog.keys().len(), 11);
        assert_eq!(catalog.default_domain(), "housing");
    }

    #[test]
    fn every_builtin_domain_has_ten_statements_and_clusters() {
        let catalog = DomainCatalog::builtin();
        for key in catalog.keys() {
            let bundle = catalog.get(key).unwrap();
            assert_eq!(bundle.statements.len(), 10, "{key}");
            assert!(!bundle.clusters.is_empty(), "{key}");
        }
    }

    #[test]
    fn aliases_pass_unknown_names_through() {
        let catalog = DomainCatalog::builtin();
        assert_eq!(catalog.alias("school-quality"), "education");
        assert_eq!(catalog.alias("noise-disruption"), "crime-public-safety");
        assert_eq!(catalog.alias("made-up"), "made-up");
    }

    #[test]
    fn guidance_falls_back_to_default_phrase() {
        let catalog = DomainCatalog::builtin();
        assert_ne!(catalog.guidance_for("housing"), catalog.guidance_for("nope"));
        assert!(!catalog.guidance_for("nope").is_empty());
    }

    #[test]
    fn catalog_round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(serde_json::to_string(&DomainCatalog::builtin()).unwrap().as_bytes())
            .unwrap();

        let loaded = DomainCatalog::from_path(&path).unwrap();
        assert_eq!(loaded.keys(), DomainCatalog::builtin().keys());
    }

    #[test]
    fn file_catalog_with_unknown_default_is_rejected() {
        let mut catalog = DomainCatalog::builtin();
        catalog.default_domain = "nowhere".into();
        assert!(matches!(catalog.validate(), Err(CatalogError::Invalid(_))));
    }
}
