use crate::catalog::DomainCatalog;
use crate::models::{Metadata, Topic};
use chrono::Utc;
use serde_json::json;

pub const GENERATION_METHOD_DEMO: &str = "demo";

/// Builds a demo topic from the catalog bundle for `domain_key`.
///
/// Returns `None` only if the key is not in the catalog; keys produced by
/// the resolver always are.
pub fn assemble(
    catalog: &DomainCatalog,
    domain_key: &str,
    location: &str,
    requested_count: usize,
    language: &str,
) -> Option<Topic> {
    let bundle = catalog.get(domain_key)?;

    let statements: Vec<_> = bundle
        .statements
        .iter()
        .take(requested_count)
        .cloned()
        .collect();

    let mut metadata = Metadata::new();
    metadata.insert("generated_at".into(), json!(Utc::now().to_rfc3339()));
    metadata.insert("community_location".into(), json!(location));
    metadata.insert("statement_count".into(), json!(statements.len()));
    metadata.insert("language".into(), json!(language));
    metadata.insert("generation_method".into(), json!(GENERATION_METHOD_DEMO));
    metadata.insert("domain".into(), json!(domain_key));

    Some(Topic {
        title: format!("{} {}", location, bundle.title),
        description: format!("{} in {}", bundle.description, location),
        main_theme: bundle.main_theme.clone(),
        statements,
        expected_clusters: bundle.clusters.clone(),
        metadata,
    })
}
