use crate::catalog::DomainCatalog;
use crate::models::{Cluster, CommunityContext, Metadata, Statement, Topic};
use async_trait::async_trait;
use chrono::Utc;
use log::warn;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

pub const GENERATION_METHOD_LLM: &str = "llm";

const DEFAULT_MAIN_THEME: &str = "Community perspective question";

const SYSTEM_PROMPT: &str = "You are an expert in community engagement and polling design. \
Generate thoughtful, balanced polling topics that encourage civic participation. \
Respond with a single JSON object and nothing else.";

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").expect("code fence pattern is valid")
});

/// Everything that can go wrong while asking the model for a topic. None of
/// these reach the HTTP caller; they trigger the demo fallback.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured for the completion service")]
    MissingCredentials,
    #[error("completion request timed out")]
    Timeout,
    #[error("completion request failed: {0}")]
    Transport(reqwest::Error),
    #[error("completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion service returned no content")]
    EmptyCompletion,
    #[error("model output is not a valid topic: {0}")]
    MalformedOutput(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::Transport(err)
        }
    }
}

/// A text completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError>;

    fn model(&self) -> &str;

    /// Whether a generation attempt is worth making at all.
    fn is_configured(&self) -> bool {
        true
    }
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredentials)?;

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": 2000,
            "temperature": 0.7,
        });

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: body.chars().take(300).collect(),
            });
        }

        let json: Value = res.json().await?;
        json["choices"][0]["message"]["content"]
            .as_str()
            .filter(|content| !content.trim().is_empty())
            .map(str::to_string)
            .ok_or(GenerationError::EmptyCompletion)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct ModelTopic {
    title: String,
    description: String,
    #[serde(default)]
    main_theme: Option<String>,
    statements: Vec<Statement>,
    expected_clusters: Vec<Cluster>,
}

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

pub fn build_prompt(
    context: &CommunityContext,
    guidance: &str,
    statement_count: usize,
    language: &str,
) -> String {
    let population = context
        .population_size
        .map(|p| p.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        r#"Create a community polling topic for {location} with a population of {population}.
Focus the topic on {guidance}.

Current issues in the community: {issues}
Previous topics covered: {previous}

Generate a JSON response with:
1. A compelling title for the polling topic
2. A brief description of what the poll will explore
3. A main theme question
4. {statement_count} diverse statements that represent different viewpoints on the topic
5. 4-6 expected opinion clusters that voters might fall into

Each statement should:
- Be specific and actionable
- Represent a distinct viewpoint
- Be relevant to the community context
- Have a category and an expected cluster whose name appears in expected_clusters

Write all text in the language with code "{language}".

Format the response as JSON with this structure:
{{
    "title": "Topic Title",
    "description": "Brief description of the poll",
    "main_theme": "Main theme question",
    "statements": [
        {{"text": "Statement text", "category": "category-name", "expected_cluster": "Cluster Name"}}
    ],
    "expected_clusters": [
        {{"name": "Cluster Name", "description": "Description of this opinion cluster"}}
    ]
}}"#,
        location = context.location(),
        issues = join_or(context.issues(), "none reported"),
        previous = join_or(context.previous_topics(), "none"),
    )
}

/// Pulls the JSON object out of a completion, tolerating code fences and
/// chatter around it.
fn extract_json(raw: &str) -> &str {
    let unfenced = CODE_FENCE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw);

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced.trim(),
    }
}

fn parse_topic(raw: &str) -> Result<ModelTopic, GenerationError> {
    let parsed: ModelTopic = serde_json::from_str(extract_json(raw))
        .map_err(|e| GenerationError::MalformedOutput(e.to_string()))?;
    if parsed.statements.is_empty() {
        return Err(GenerationError::MalformedOutput("no statements".into()));
    }
    Ok(parsed)
}

/// Asks the completion backend for a topic. Any failure is returned whole;
/// the caller decides how to recover.
pub async fn generate_via_llm(
    client: &dyn CompletionClient,
    catalog: &DomainCatalog,
    context: &CommunityContext,
    domain_key: &str,
    statement_count: usize,
    language: &str,
) -> Result<Topic, GenerationError> {
    if !client.is_configured() {
        return Err(GenerationError::MissingCredentials);
    }

    let prompt = build_prompt(context, catalog.guidance_for(domain_key), statement_count, language);
    let raw = client.complete(SYSTEM_PROMPT, &prompt).await?;
    let parsed = parse_topic(&raw)?;

    let topic = Topic {
        title: parsed.title,
        description: parsed.description,
        main_theme: parsed
            .main_theme
            .filter(|theme| !theme.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MAIN_THEME.to_string()),
        statements: parsed.statements,
        expected_clusters: parsed.expected_clusters,
        metadata: Metadata::new(),
    };

    // Kept as generated; results for these statements simply land in no cluster.
    for name in topic.dangling_cluster_refs() {
        warn!("Model statement references undeclared cluster '{}'", name);
    }

    let mut metadata = Metadata::new();
    metadata.insert("generated_at".into(), json!(Utc::now().to_rfc3339()));
    metadata.insert("community_location".into(), json!(context.location()));
    metadata.insert("statement_count".into(), json!(topic.statements.len()));
    metadata.insert("language".into(), json!(language));
    metadata.insert("generation_method".into(), json!(GENERATION_METHOD_LLM));
    metadata.insert("model".into(), json!(client.model()));
    metadata.insert("domain".into(), json!(domain_key));

    Ok(Topic { metadata, ..topic })
}
