//! Session setup and chat calls against the LiveHint AI API.

use super::common::Endpoint;
use super::transport::{RequestSpec, Transport};
use crate::errors::LiveHintError;
use crate::types::{
    ChatMessage, CreateSessionRequest, CreateSessionResponse, ProblemInfo, ProblemRef, SessionId,
    SessionSettings, SYSTEM_PROMPT_NUM, TUTORBOT_TYPE, UpdateSessionRequest,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

fn to_body<T: Serialize>(value: &T, what: &str) -> Result<Value, LiveHintError> {
    serde_json::to_value(value)
        .map_err(|e| LiveHintError::Request(format!("Failed to serialize {what}: {e}")))
}

fn from_body<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, LiveHintError> {
    serde_json::from_value(value)
        .map_err(|e| LiveHintError::Request(format!("Unexpected {what} response: {e}")))
}

/// Resolves a problem reference into its problem id and tutorbot descriptor.
pub async fn get_problem_info(
    transport: &Transport,
    problem: &ProblemRef,
) -> Result<ProblemInfo, LiveHintError> {
    let spec = RequestSpec::new(Endpoint::ProblemInfo)
        .with_query(problem.query_params())
        .with_timeout(transport.config().problem_info_timeout());

    let info: ProblemInfo = from_body(transport.send_json(spec).await?, "problem-info")?;
    debug!(
        "Resolved problem: problem_id={:?}, has_tutorbot={}",
        info.problem_id,
        info.tutorbot.is_some()
    );
    Ok(info)
}

/// Creates a session for a resolved problem and returns its id.
///
/// A response without a non-empty `session_id` is an error: an empty id
/// must never reach the caller.
pub async fn create_session(
    transport: &Transport,
    problem: &ProblemRef,
    info: &ProblemInfo,
) -> Result<SessionId, LiveHintError> {
    let body = to_body(
        &CreateSessionRequest {
            app_context: problem.app_context(),
            problem_id: info.problem_id.as_ref(),
            tutorbot: info.tutorbot.as_ref(),
        },
        "session request",
    )?;
    let spec = RequestSpec::new(Endpoint::CreateSession).with_body(body);

    let created: CreateSessionResponse = from_body(transport.send_json(spec).await?, "session")?;
    match created.session_id {
        Some(id) if !id.is_empty() => {
            debug!("Session created: ID={id}");
            Ok(SessionId::from(id))
        }
        _ => {
            let error = LiveHintError::Request(
                "POST /api/session: response did not contain a session id".to_string(),
            );
            tracing::warn!("{error}");
            Err(error)
        }
    }
}

/// Applies model, temperature and bot type to a new session.
///
/// Always sent as non-streaming: streaming is chosen per chat call.
pub async fn update_session(
    transport: &Transport,
    session: &SessionId,
    settings: &SessionSettings,
) -> Result<(), LiveHintError> {
    let body = to_body(
        &UpdateSessionRequest {
            model: &settings.model,
            stream: false,
            temperature: settings.temperature,
            tutorbot_type: TUTORBOT_TYPE,
        },
        "session update",
    )?;
    let spec = RequestSpec::new(Endpoint::UpdateSession {
        session_id: session.as_str(),
    })
    .with_body(body);

    transport.send_discarding_body(spec).await?;
    debug!(
        "Session configured: ID={session}, model={}, temperature={}",
        settings.model, settings.temperature
    );
    Ok(())
}

/// Runs the three setup steps in order. Any failure aborts the sequence
/// before the next step and no session id is returned.
pub async fn init_session(
    transport: &Transport,
    problem: &ProblemRef,
    settings: &SessionSettings,
) -> Result<SessionId, LiveHintError> {
    let info = get_problem_info(transport, problem).await?;
    let session = create_session(transport, problem, &info).await?;
    update_session(transport, &session, settings).await?;
    Ok(session)
}

/// Fetches the opening chat turn(s) for a session.
///
/// Non-streaming returns the single JSON response; streaming returns every
/// `data:` message received before the done sentinel.
pub async fn start_chat(
    transport: &Transport,
    session: &SessionId,
    stream: bool,
) -> Result<Vec<ChatMessage>, LiveHintError> {
    let spec = RequestSpec::new(Endpoint::ChatResponse {
        session_id: session.as_str(),
    })
    .with_query(vec![
        ("system_prompt_num", SYSTEM_PROMPT_NUM.to_string()),
        ("stream", stream.to_string()),
    ]);

    if stream {
        transport.send_stream(spec).await
    } else {
        Ok(vec![transport.send_json(spec).await?])
    }
}

/// Sends a student message and returns the bot's reply.
///
/// Never streams, whatever the session or previous calls used.
pub async fn send_message(
    transport: &Transport,
    session: &SessionId,
    content: &str,
) -> Result<Vec<ChatMessage>, LiveHintError> {
    let spec = RequestSpec::new(Endpoint::ChatResponse {
        session_id: session.as_str(),
    })
    .with_query(vec![("content", content.to_string())]);

    Ok(vec![transport.send_json(spec).await?])
}
