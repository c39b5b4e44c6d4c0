use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

pub type Metadata = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub text: String,
    pub category: String,
    pub expected_cluster: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    pub description: String,
    pub main_theme: String,
    pub statements: Vec<Statement>,
    pub expected_clusters: Vec<Cluster>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Topic {
    /// Indices of the statements expected to fall into `cluster_name`.
    pub fn statements_in_cluster(&self, cluster_name: &str) -> Vec<usize> {
        self.statements
            .iter()
            .enumerate()
            .filter(|(_, statement)| statement.expected_cluster == cluster_name)
            .map(|(index, _)| index)
            .collect()
    }

    /// Statement cluster names with no matching entry in `expected_clusters`.
    pub fn dangling_cluster_refs(&self) -> Vec<&str> {
        self.statements
            .iter()
            .map(|statement| statement.expected_cluster.as_str())
            .filter(|name| !self.expected_clusters.iter().any(|c| c.name == *name))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommunityContext {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub demographics: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub population_size: Option<u64>,
    #[serde(default)]
    pub current_issues: Option<Vec<String>>,
    #[serde(default)]
    pub previous_topics: Option<Vec<String>>,
}

impl CommunityContext {
    pub fn location(&self) -> &str {
        self.location.as_deref().map(str::trim).unwrap_or_default()
    }

    pub fn issues(&self) -> &[String] {
        self.current_issues.as_deref().unwrap_or_default()
    }

    pub fn previous_topics(&self) -> &[String] {
        self.previous_topics.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedPoll {
    pub poll_id: String,
    #[serde(flatten)]
    pub topic: Topic,
    pub created_at: DateTime<Utc>,
    pub creator_name: Option<String>,
}

impl SharedPoll {
    pub fn new(topic: Topic, creator_name: Option<String>) -> Self {
        Self {
            poll_id: Uuid::new_v4().to_string(),
            topic,
            // Stored with microsecond precision.
            created_at: Utc::now().trunc_subsecs(6),
            creator_name: creator_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Agree,
    Disagree,
    Skip,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Agree => "agree",
            ResponseKind::Disagree => "disagree",
            ResponseKind::Skip => "skip",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "agree" => Some(ResponseKind::Agree),
            "disagree" => Some(ResponseKind::Disagree),
            "skip" => Some(ResponseKind::Skip),
            _ => None,
        }
    }
}

/// One answer inside a submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatementResponse {
    #[serde(rename = "statementIndex", alias = "statement_index")]
    pub statement_index: usize,
    pub response: ResponseKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollResponse {
    pub poll_id: String,
    pub participant_name: Option<String>,
    pub statement_index: usize,
    pub response: ResponseKind,
    pub timestamp: DateTime<Utc>,
    pub participant_session_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub session_id: String,
    pub responses_saved: usize,
    pub is_retake: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantStatus {
    pub has_responded: bool,
    pub response_count: i64,
    pub last_taken: Option<DateTime<Utc>>,
}

/// Normalizes a submitted participant name. Blank names and the
/// "Anonymous" placeholder sent by the web client map to `None`.
pub fn participant_name(raw: Option<&str>) -> Option<String> {
    let name = raw?.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("anonymous") {
        None
    } else {
        Some(name.to_string())
    }
}
