pub mod assembler;
pub mod llm;
pub mod resolver;

use crate::catalog::DomainCatalog;
use crate::error::AppError;
use crate::models::{CommunityContext, Topic};
use llm::{CompletionClient, GenerationError};
use log::{info, warn};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_STATEMENT_COUNT: usize = 10;

fn default_statement_count() -> usize {
    DEFAULT_STATEMENT_COUNT
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicRequest {
    pub community_context: CommunityContext,
    #[serde(default)]
    pub topic_domain: Option<String>,
    #[serde(default = "default_statement_count")]
    pub statement_count: usize,
    #[serde(default = "default_language")]
    pub language: String,
}

/// Request shape of the legacy endpoint: context only.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyTopicRequest {
    pub community_context: CommunityContext,
}

impl From<LegacyTopicRequest> for TopicRequest {
    fn from(legacy: LegacyTopicRequest) -> Self {
        Self {
            community_context: legacy.community_context,
            topic_domain: None,
            statement_count: DEFAULT_STATEMENT_COUNT,
            language: default_language(),
        }
    }
}

/// Produces topics, preferring the model and falling back to the catalog.
pub struct TopicGenerator {
    catalog: Arc<DomainCatalog>,
    llm: Arc<dyn CompletionClient>,
    llm_timeout: Duration,
}

impl TopicGenerator {
    pub fn new(catalog: Arc<DomainCatalog>, llm: Arc<dyn CompletionClient>, llm_timeout: Duration) -> Self {
        Self {
            catalog,
            llm,
            llm_timeout,
        }
    }

    pub fn catalog(&self) -> &DomainCatalog {
        &self.catalog
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.is_configured()
    }

    /// Never fails because of the completion backend; only a catalog that
    /// cannot produce its own default domain is an error here.
    pub async fn generate(&self, request: &TopicRequest) -> Result<Topic, AppError> {
        let context = &request.community_context;
        let domain = {
            let mut rng = rand::thread_rng();
            resolver::resolve(
                &self.catalog,
                request.topic_domain.as_deref(),
                context.issues(),
                &mut rng,
            )
        };
        info!(
            "Generating topic for '{}' (domain: {}, requested: {:?})",
            context.location(),
            domain,
            request.topic_domain
        );

        match self.try_llm(request, &domain).await {
            Ok(topic) => {
                info!("Generated LLM topic: {}", topic.title);
                return Ok(topic);
            }
            Err(GenerationError::MissingCredentials) => {
                info!("No completion API key configured, using demo generation");
            }
            Err(e) => {
                warn!("LLM generation failed, falling back to demo: {}", e);
            }
        }

        self.demo_topic(request, &domain)
    }

    async fn try_llm(&self, request: &TopicRequest, domain: &str) -> Result<Topic, GenerationError> {
        let attempt = llm::generate_via_llm(
            self.llm.as_ref(),
            &self.catalog,
            &request.community_context,
            domain,
            request.statement_count,
            &request.language,
        );
        tokio::time::timeout(self.llm_timeout, attempt)
            .await
            .map_err(|_| GenerationError::Timeout)?
    }

    fn demo_topic(&self, request: &TopicRequest, domain: &str) -> Result<Topic, AppError> {
        let location = request.community_context.location();
        let topic = assembler::assemble(&self.catalog, domain, location, request.statement_count, &request.language)
            .or_else(|| {
                assembler::assemble(
                    &self.catalog,
                    self.catalog.default_domain(),
                    location,
                    request.statement_count,
                    &request.language,
                )
            })
            .ok_or_else(|| AppError::Internal("catalog has no default domain".into()))?;
        info!("Generated demo topic: {} (domain: {})", topic.title, domain);
        Ok(topic)
    }
}
