use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request, Response},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::{
    web::{midware, request_id, routes::routes, REQUEST_ID_HEADER},
    App, AppState,
};

pub type ServeResult<T> = core::result::Result<T, ServeError>;

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("io error while serving: {0}")]
    Io(#[from] std::io::Error),
}

/// Serves the landing page and the subscribe API until the listener fails.
pub async fn serve(app: App) -> ServeResult<()> {
    let App {
        app_state,
        listener,
    } = app;

    axum::serve(listener, app_router(app_state)).await?;

    Ok(())
}

/// All routes wrapped in the request stack.
///
/// Requests pass the layers top down and responses bottom up: the id is set before the
/// trace span and the response mapper read it, and copied onto the response last.
pub fn app_router(app_state: AppState) -> Router {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_request(on_request)
                .on_response(on_response),
        )
        .layer(middleware::map_response(midware::response_mapper))
        .layer(PropagateRequestIdLayer::new(x_request_id));

    routes(app_state).layer(stack)
}

fn request_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        req_id = request_id(req.headers()).unwrap_or_default(),
        method = %req.method(),
        path = req.uri().path()
    )
}

fn on_request(req: &Request<Body>, _span: &Span) {
    tracing::debug!("{:<20} - {}", "START", req.uri());
}

fn on_response(res: &Response<Body>, latency: Duration, _span: &Span) {
    let status = res.status();

    if status.is_client_error() || status.is_server_error() {
        tracing::warn!("{:<20} - {status} in {latency:?}", "END");
    } else {
        tracing::info!("{:<20} - {status} in {latency:?}", "END");
    }
}
