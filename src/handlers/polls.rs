use super::AppState;
use crate::error::AppError;
use crate::models::{ParticipantStatus, SharedPoll, StatementResponse, Topic, participant_name};
use crate::results::alignment::{ClusterAlignment, cluster_alignments};
use crate::results::{PollResults, calculate_results};
use axum::Json;
use axum::extract::{Path, State};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SavePollRequest {
    pub topic: Topic,
    #[serde(default)]
    pub creator_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavePollResponse {
    pub poll_id: String,
    pub share_url: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitResponsesRequest {
    #[serde(default)]
    pub participant_name: Option<String>,
    pub responses: Vec<StatementResponse>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponsesResponse {
    pub session_id: String,
    pub responses_saved: usize,
    pub is_retake: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ParticipantAlignment {
    pub participant_name: String,
    pub session_id: String,
    pub alignments: Vec<ClusterAlignment>,
}

pub async fn save_poll(
    State(state): State<AppState>,
    Json(request): Json<SavePollRequest>,
) -> Result<Json<SavePollResponse>, AppError> {
    if request.topic.statements.is_empty() {
        return Err(AppError::Validation("topic must contain at least one statement".into()));
    }

    let creator = participant_name(request.creator_name.as_deref());
    let poll = state.database.save_poll(&request.topic, creator).await?;

    Ok(Json(SavePollResponse {
        share_url: format!("{}/poll/shared/{}", state.share_base_url, poll.poll_id),
        poll_id: poll.poll_id,
    }))
}

pub async fn get_poll(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
) -> Result<Json<SharedPoll>, AppError> {
    Ok(Json(state.database.get_poll(&poll_id).await?))
}

pub async fn submit_responses(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Json(request): Json<SubmitResponsesRequest>,
) -> Result<Json<SubmitResponsesResponse>, AppError> {
    let poll = state.database.get_poll(&poll_id).await?;

    if request.responses.is_empty() {
        return Err(AppError::Validation("at least one response is required".into()));
    }
    let statement_count = poll.topic.statements.len();
    if let Some(bad) = request.responses.iter().find(|r| r.statement_index >= statement_count) {
        return Err(AppError::Validation(format!(
            "statement index {} is out of range (poll has {} statements)",
            bad.statement_index, statement_count
        )));
    }

    let name = participant_name(request.participant_name.as_deref());
    let receipt = state
        .database
        .submit_responses(&poll_id, name.as_deref(), &request.responses)
        .await?;

    let message = if receipt.is_retake {
        "Responses updated successfully"
    } else {
        "Responses saved successfully"
    };
    info!(
        "Poll {}: saved {} responses for {} (retake: {})",
        poll_id,
        receipt.responses_saved,
        name.as_deref().unwrap_or("anonymous"),
        receipt.is_retake
    );

    Ok(Json(SubmitResponsesResponse {
        session_id: receipt.session_id,
        responses_saved: receipt.responses_saved,
        is_retake: receipt.is_retake,
        message: message.to_string(),
    }))
}

/// Path names go through the same normalization as submitted names;
/// anonymous sessions are stored without a name and cannot be looked up.
fn named_participant(raw: &str) -> Result<String, AppError> {
    participant_name(Some(raw)).ok_or_else(|| {
        AppError::Validation("anonymous participants cannot be looked up by name".into())
    })
}

pub async fn participant_status(
    State(state): State<AppState>,
    Path((poll_id, name)): Path<(String, String)>,
) -> Result<Json<ParticipantStatus>, AppError> {
    let name = named_participant(&name)?;
    let status = state.database.participant_status(&poll_id, &name).await?;
    Ok(Json(status))
}

pub async fn participant_alignment(
    State(state): State<AppState>,
    Path((poll_id, name)): Path<(String, String)>,
) -> Result<Json<ParticipantAlignment>, AppError> {
    let name = named_participant(&name)?;
    let poll = state.database.get_poll(&poll_id).await?;

    let session = state.database.get_latest_session(&poll_id, &name).await?;
    let Some(first) = session.first() else {
        return Err(AppError::NotFound(format!("no responses from '{}' on poll {}", name, poll_id)));
    };

    Ok(Json(ParticipantAlignment {
        session_id: first.participant_session_id.clone(),
        alignments: cluster_alignments(&poll, &session),
        participant_name: name,
    }))
}

pub async fn poll_results(
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
) -> Result<Json<PollResults>, AppError> {
    let poll = state.database.get_poll(&poll_id).await?;
    let responses = state.database.get_poll_responses(&poll_id).await?;
    Ok(Json(calculate_results(&poll, &responses)))
}
