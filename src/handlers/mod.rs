mod polls;
mod topics;

use crate::db::Database;
use crate::topics::TopicGenerator;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub database: Arc<Database>,
    pub generator: Arc<TopicGenerator>,
    pub share_base_url: Arc<str>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/generate-topic", post(topics::generate_topic))
        .route("/generate-topic-legacy", post(topics::generate_topic_legacy))
        .route("/demo-domains", get(topics::demo_domains))
        .route("/save-poll", post(polls::save_poll))
        .route("/poll/{poll_id}", get(polls::get_poll))
        .route("/poll/{poll_id}/responses", post(polls::submit_responses))
        .route("/poll/{poll_id}/participant/{name}", get(polls::participant_status))
        .route("/poll/{poll_id}/participant/{name}/alignment", get(polls::participant_alignment))
        .route("/poll/{poll_id}/results", get(polls::poll_results))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match state.database.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            log::warn!("Health check could not reach the poll store: {}", e);
            "unavailable"
        }
    };
    Json(json!({
        "status": "healthy",
        "service": "community-topic-generator",
        "database": database,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": "Community Polling Topic Generator",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Generate community-relevant polling topics using LLM or demo data",
        "endpoints": {
            "generate": "/generate-topic",
            "legacy": "/generate-topic-legacy",
            "health": "/health",
            "domains": "/demo-domains",
            "save": "/save-poll",
            "poll": "/poll/{poll_id}",
            "responses": "/poll/{poll_id}/responses",
            "participant": "/poll/{poll_id}/participant/{name}",
            "alignment": "/poll/{poll_id}/participant/{name}/alignment",
            "results": "/poll/{poll_id}/results",
        },
        "features": {
            "llm_generation": state.generator.llm_enabled(),
            "demo_domains": state.generator.catalog().keys(),
        },
    }))
}
