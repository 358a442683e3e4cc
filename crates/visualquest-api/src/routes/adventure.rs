//! Routes for the narrative session context.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get, routing::post};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use visualquest_core::command::Command as _;
use visualquest_core::error::DomainError;
use visualquest_core::generation::{ImageContentType, ImagePayload};
use visualquest_core::transcription::Transcriber;
use visualquest_session::application::command_handlers;
use visualquest_session::application::query_handlers::{self, AdventureView};
use visualquest_session::domain::aggregates::DEFAULT_STEP_LIMIT;
use visualquest_session::domain::commands;
use visualquest_session::domain::segment::{DecisionSource, Segment};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /attach-image.
#[derive(Debug, Deserialize)]
pub struct AttachImageRequest {
    /// The session to attach the image to.
    pub session_id: Uuid,
    /// Base64-encoded image bytes.
    pub image_base64: String,
    /// MIME type of the image (`image/png` or `image/jpeg`).
    pub content_type: String,
}

/// Request body for POST /start.
#[derive(Debug, Deserialize)]
pub struct StartAdventureRequest {
    /// The session to start.
    pub session_id: Uuid,
    /// Number of decisions before the story concludes; defaults when absent.
    #[serde(default)]
    pub step_limit: Option<u32>,
}

/// Request body for POST /decide. Exactly one of `text` and `audio_base64`
/// must be present.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// The session the decision belongs to.
    pub session_id: Uuid,
    /// The typed decision.
    #[serde(default)]
    pub text: Option<String>,
    /// Base64-encoded audio clip of the spoken decision.
    #[serde(default)]
    pub audio_base64: Option<String>,
}

/// Request body for POST /reset.
#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    /// The session to reset.
    pub session_id: Uuid,
}

/// Response body returned after a command is successfully handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
    /// History segments appended by this command, in order.
    pub segments: Vec<Segment>,
    /// Whether this command concluded the adventure.
    pub concluded: bool,
}

impl From<command_handlers::AdventureCommandResult> for CommandResponse {
    fn from(result: command_handlers::AdventureCommandResult) -> Self {
        Self {
            event_ids: result.stored_events.iter().map(|e| e.event_id).collect(),
            segments: result.segments,
            concluded: result.concluded,
        }
    }
}

/// Response body for POST /reset.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    /// The session that was reset.
    pub session_id: Uuid,
}

/// POST /attach-image
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
async fn attach_image(
    State(state): State<AppState>,
    Json(request): Json<AttachImageRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let content_type = ImageContentType::parse(&request.content_type)?;
    // Reject clearly broken payloads before they reach the vision model.
    BASE64.decode(&request.image_base64).map_err(|e| {
        DomainError::Validation(format!("image_base64 is not valid base64: {e}"))
    })?;

    let command = commands::AttachImage {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
        image: ImagePayload {
            content_type,
            data_base64: request.image_base64,
        },
    };

    info!(correlation_id = %command.correlation_id, command = command.command_type(), "handling command");

    let result = command_handlers::handle_attach_image(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /start
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
async fn start_adventure(
    State(state): State<AppState>,
    Json(request): Json<StartAdventureRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::StartAdventure {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
        step_limit: request.step_limit.unwrap_or(DEFAULT_STEP_LIMIT),
    };

    info!(correlation_id = %command.correlation_id, command = command.command_type(), "handling command");

    let result = command_handlers::handle_start_adventure(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
        &*state.generator,
    )
    .await?;

    Ok(Json(result.into()))
}

/// Resolves a decision request into text, transcribing the audio path.
async fn resolve_decision(
    request: DecisionRequest,
    transcriber: &dyn Transcriber,
) -> Result<(String, DecisionSource), DomainError> {
    match (request.text, request.audio_base64) {
        (Some(text), None) => Ok((text, DecisionSource::Typed)),
        (None, Some(audio_base64)) => {
            let audio = BASE64.decode(&audio_base64).map_err(|e| {
                DomainError::Validation(format!("audio_base64 is not valid base64: {e}"))
            })?;
            let text = transcriber.transcribe(&audio).await?;
            Ok((text, DecisionSource::Transcribed))
        }
        _ => Err(DomainError::Validation(
            "provide exactly one of text or audio_base64".to_owned(),
        )),
    }
}

/// POST /decide
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
async fn submit_decision(
    State(state): State<AppState>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let session_id = request.session_id;
    let (text, source) = resolve_decision(request, &*state.transcriber).await?;

    let command = commands::SubmitDecision {
        correlation_id: Uuid::new_v4(),
        session_id,
        text,
        source,
    };

    info!(correlation_id = %command.correlation_id, command = command.command_type(), "handling command");

    let result = command_handlers::handle_submit_decision(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
        &*state.generator,
    )
    .await?;

    Ok(Json(result.into()))
}

/// POST /reset
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
async fn reset_adventure(
    State(state): State<AppState>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<ResetResponse>, ApiError> {
    let command = commands::ResetAdventure {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
    };

    info!(correlation_id = %command.correlation_id, command = command.command_type(), "handling command");

    command_handlers::handle_reset_adventure(&command, &*state.event_repository).await?;

    Ok(Json(ResetResponse {
        session_id: command.session_id,
    }))
}

/// GET /{session_id}
#[instrument(skip(state))]
async fn get_adventure(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AdventureView>, ApiError> {
    let view = query_handlers::get_adventure_by_id(session_id, &*state.event_repository).await?;
    Ok(Json(view))
}

/// Returns the router for the narrative session context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/attach-image", post(attach_image))
        .route("/start", post(start_adventure))
        .route("/decide", post(submit_decision))
        .route("/reset", post(reset_adventure))
        .route("/{session_id}", get(get_adventure))
}
