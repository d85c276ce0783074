mod error;
mod log;
pub mod midware;
pub mod routes;
pub mod types;

use axum::http::HeaderMap;

pub use error::{ClientError, Error, WebResult};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The id `SetRequestIdLayer` attached to the request, if it is valid ASCII.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
}
