use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use crate::{subscriber_client, web::routes::SubscribeError};

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("subscribe route error: {0}")]
    Subscribe(#[from] SubscribeError),

    #[error("tera template render error: {0}")]
    Tera(#[from] tera::Error),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        match self {
            Error::Subscribe(subscribe_er) => match subscribe_er {
                SubscribeError::InvalidEmail(_) => {
                    (StatusCode::BAD_REQUEST, ClientError::InvalidEmail)
                }
                SubscribeError::IncompleteConfig => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ClientError::IncompleteConfig,
                ),
                SubscribeError::SubscriberApi(subscriber_client::Error::Rejected {
                    body, ..
                }) => (
                    StatusCode::BAD_GATEWAY,
                    ClientError::UpstreamRejected {
                        details: body.clone(),
                    },
                ),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, ClientError::ServiceError),
            },
            _ => (StatusCode::INTERNAL_SERVER_ERROR, ClientError::ServiceError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// What the visitor gets to see. Messages are shown as-is by the landing page.
#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("البريد الإلكتروني غير صالح.")]
    InvalidEmail,
    #[display("الإعدادات غير مكتملة. أضف MAILERLITE_API_KEY و MAILERLITE_GROUP_ID في .env.")]
    IncompleteConfig,
    #[display("فشل التسجيل في MailerLite.")]
    UpstreamRejected { details: String },
    #[display("حصل خطأ غير متوقع.")]
    ServiceError,
}

impl ClientError {
    /// Upstream diagnostics passed through to the client.
    pub fn details(&self) -> Option<&str> {
        match self {
            ClientError::UpstreamRejected { details } => Some(details),
            _ => None,
        }
    }
}
