//! The webhook endpoint.

use crate::dispatch::{Action, Dispatch};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use eventsub_verify::{extract, header::MESSAGE_TYPE, resolve, verify, Error, SigningKey};
use serde::Deserialize;
use std::sync::Arc;

/// Sent instead of an error when a message fails verification, so a prober
/// learns nothing about how far its request got.
pub const DECOY: &str = "you're my good puppy\n";

/// State shared by all requests. Never mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<[SigningKey]>,
    pub dispatcher: Arc<dyn Dispatch>,
}

impl AppState {
    pub fn new(keys: Vec<SigningKey>, dispatcher: Arc<dyn Dispatch>) -> Self {
        Self {
            keys: keys.into(),
            dispatcher,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handle))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Payload {
    pub challenge: String,
    pub event: Event,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Event {
    pub user_input: String,
    pub reward: Reward,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Reward {
    pub title: String,
}

/// The `Twitch-Eventsub-Message-Type` header.
#[derive(Debug, PartialEq, Eq)]
pub enum MessageType {
    Verification,
    Notification,
    Revocation,
    Other(String),
}

impl MessageType {
    pub fn new(value: &[u8]) -> Self {
        match value {
            b"webhook_callback_verification" => Self::Verification,
            b"notification" => Self::Notification,
            b"revocation" => Self::Revocation,
            other => Self::Other(String::from_utf8_lossy(other).into_owned()),
        }
    }
}

/// Handle one delivery.
///
/// Only an authentic message gets past verification; everything else gets
/// the decoy with a success status.
pub async fn handle(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let permissions = match verify(&headers, &body, &state.keys) {
        Ok(permissions) => permissions,
        Err(e) => {
            tracing::warn!(reason = %e, "failed to verify signature");
            return DECOY.into_response();
        }
    };

    let message_type = match extract(MESSAGE_TYPE, &headers) {
        Ok(value) => MessageType::new(value),
        Err(e) => {
            tracing::warn!("{e}");
            return StatusCode::OK.into_response();
        }
    };

    let payload: Payload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("bad body: {e}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match message_type {
        MessageType::Verification => {
            tracing::info!(challenge = %payload.challenge, "got verification callback");
            ([(header::CONTENT_TYPE, "text/plain")], payload.challenge).into_response()
        }
        MessageType::Notification => {
            let Event { user_input, reward } = payload.event;
            match resolve(&reward.title, permissions) {
                Ok(kind) => state.dispatcher.dispatch(Action { kind, user_input }),
                Err(Error::ActionDenied(kind)) => {
                    tracing::warn!(
                        action = %kind,
                        title = %reward.title,
                        "authentic message requested an action outside its key's scope"
                    );
                }
                Err(e) => tracing::warn!("{e}"),
            }
            StatusCode::OK.into_response()
        }
        MessageType::Revocation => {
            tracing::info!("subscription revoked");
            StatusCode::OK.into_response()
        }
        MessageType::Other(other) => {
            tracing::info!(message_type = %other, "got something else");
            StatusCode::OK.into_response()
        }
    }
}
