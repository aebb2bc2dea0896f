//! Tag every request and its response with an `X-Request-Id` header.

use axum::{
    http::{HeaderName, HeaderValue, Request},
    Router,
};
use base64::{display::Base64Display, engine::general_purpose::STANDARD_NO_PAD};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeUuidV7RequestId))
}

/// Time ordered uuid, rendered as unpadded base64.
#[derive(Debug, Clone, Copy)]
struct MakeUuidV7RequestId;

impl MakeRequestId for MakeUuidV7RequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Base64Display::new(Uuid::now_v7().as_bytes(), &STANDARD_NO_PAD).to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}
