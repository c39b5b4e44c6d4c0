use super::AppState;
use crate::error::AppError;
use crate::models::Topic;
use crate::topics::{LegacyTopicRequest, TopicRequest};
use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

pub async fn generate_topic(
    State(state): State<AppState>,
    Json(request): Json<TopicRequest>,
) -> Result<Json<Topic>, AppError> {
    if request.community_context.location().is_empty() {
        return Err(AppError::Validation("community_context.location is required".into()));
    }
    if request.statement_count == 0 {
        return Err(AppError::Validation("statement_count must be at least 1".into()));
    }

    let topic = state.generator.generate(&request).await?;
    Ok(Json(topic))
}

pub async fn generate_topic_legacy(
    state: State<AppState>,
    Json(request): Json<LegacyTopicRequest>,
) -> Result<Json<Topic>, AppError> {
    generate_topic(state, Json(TopicRequest::from(request))).await
}

pub async fn demo_domains(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "available_domains": state.generator.catalog().keys(),
        "description": "Available topic domains for demo generation",
    }))
}
