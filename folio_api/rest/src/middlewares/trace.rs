use std::time::Duration;

use axum::{extract::Request, response::Response, Router};
use tower_http::{request_id::RequestId, trace::TraceLayer};
use tracing::{debug, warn, Span};

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(make_span)
            .on_request(on_request)
            .on_response(on_response)
            .on_body_chunk(())
            .on_eos(())
            .on_failure(()),
    )
}

fn make_span(request: &Request) -> Span {
    let method = request.method();
    let route = request.uri();
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or_default();

    tracing::debug_span!("http-request", %method, %route, request_id)
}

fn on_request(_request: &Request, _span: &Span) {
    debug!("started processing request")
}

fn on_response(response: &Response, latency: Duration, _span: &Span) {
    let status = response.status();
    if status.is_server_error() {
        warn!(?latency, %status, "request failed");
    } else {
        debug!(?latency, %status, "finished processing request");
    }
}
