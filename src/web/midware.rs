use std::sync::Arc;

use axum::{
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::web::{log::LogLine, request_id, Error};

/// Turns a `web::Error` stored in the response extensions into the JSON error body
/// `{ "error": ..., "details"?: ... }` and logs one line per request, keyed by the
/// request's `x-request-id`.
pub async fn response_mapper(
    req_method: Method,
    uri: Uri,
    headers: HeaderMap,
    resp: Response,
) -> Response {
    // Only missing when the mapper runs outside of the request id layer.
    let req_id = request_id(&headers)
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let (resp, logline) = map_response(req_id, &req_method, &uri, resp);
    logline.emit();

    resp
}

fn map_response(
    req_id: String,
    req_method: &Method,
    uri: &Uri,
    resp: Response,
) -> (Response, LogLine) {
    let web_error = resp.extensions().get::<Arc<Error>>().map(|er| er.as_ref());
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    let logline = LogLine::new(
        req_id,
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error.as_ref(),
    );

    let err_resp = client_status_and_error.map(|(status, cl_err)| {
        let mut body = Map::new();
        body.insert("error".into(), json!(cl_err.to_string()));
        if let Some(details) = cl_err.details() {
            body.insert("details".into(), json!(details));
        }

        (status, Json(Value::Object(body))).into_response()
    });

    (err_resp.unwrap_or(resp), logline)
}
