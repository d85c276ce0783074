use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};
use tracing::{info, Span};

use crate::{
    subscriber_client,
    web::{
        types::{BodyParsingError, DataParsingError, SubscribeRequest, SubscriberEmail},
        WebResult,
    },
    AppState,
};

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("invalid subscriber email: {0}")]
    InvalidEmail(#[from] DataParsingError),
    #[error("subscriber API key or group ID is not configured")]
    IncompleteConfig,

    #[error("malformed request body: {0}")]
    MalformedBody(#[from] BodyParsingError),
    #[error("subscriber API error: {0}")]
    SubscriberApi(#[from] subscriber_client::Error),
}

// ###################################
// ->   API
// ###################################
/// Validates the submitted email and forwards it to the subscriber API.
/// The body is parsed by hand so that a malformed payload is reported like any other
/// unexpected failure.
#[tracing::instrument(
    name = "Forwarding a new subscriber",
    skip_all,
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(State(app_state): State<AppState>, body: Bytes) -> WebResult<Json<Value>> {
    let request = SubscribeRequest::from_body(&body).map_err(SubscribeError::MalformedBody)?;
    let email = SubscriberEmail::try_from(request).map_err(SubscribeError::InvalidEmail)?;
    Span::current().record("subscriber_email", tracing::field::display(&email));

    let client = &app_state.subscriber_client;
    let credentials = client
        .credentials()
        .ok_or(SubscribeError::IncompleteConfig)?;

    client
        .add_subscriber(&email, credentials)
        .await
        .map_err(SubscribeError::SubscriberApi)?;
    info!("SUCCESS");

    Ok(Json(json!({ "ok": true })))
}
