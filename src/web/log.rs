use axum::http::{Method, StatusCode, Uri};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use super::error::ClientError;
use crate::web::Error;

/// One structured line per served request.
#[derive(Serialize)]
pub struct LogLine {
    pub timestamp: String,
    pub req_id: String,

    pub req_method: String,
    pub uri: String,
    pub status_code: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_error_data: Option<String>,
}

impl LogLine {
    pub fn new(
        req_id: String,
        req_method: &Method,
        uri: &Uri,
        status_code: StatusCode,
        web_error: Option<&Error>,
        client_status_and_error: Option<&(StatusCode, ClientError)>,
    ) -> Self {
        // The client facing status wins over the placeholder 500 of an error response.
        let status_code = client_status_and_error
            .map(|(sc, _)| *sc)
            .unwrap_or(status_code);

        LogLine {
            timestamp: chrono::Utc::now().to_rfc3339(),
            req_id,
            req_method: req_method.to_string(),
            uri: uri.to_string(),
            status_code: status_code.as_u16(),
            client_error_type: client_status_and_error.map(|(_, ce)| ce.as_ref().to_string()),
            web_error_type: web_error.map(|we| we.as_ref().to_string()),
            web_error_data: web_error.map(|we| we.to_string()),
        }
    }

    pub fn emit(&self) {
        if self.web_error_type.is_some() {
            error!("LOGLINE: {}", json!(self));
        } else {
            info!("LOGLINE: {}", json!(self));
        }
    }
}
