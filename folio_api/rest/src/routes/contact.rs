use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use folio_models::contact::ContactSubmission;
use serde_json::Value;
use tracing::error;

use super::error;
use crate::models::ApiResponse;

const SENT: &str = "Message sent successfully! I'll get back to you soon.";
const INVALID_FORM_DATA: &str = "Invalid form data. Please check your inputs.";
const CONFIGURATION_ERROR: &str = "Server configuration error. Please try again later.";
const VERIFICATION_ERROR: &str = "Email service configuration error. Please try again later.";
const AUTHENTICATION_ERROR: &str = "Email authentication failed. Please try again later.";
const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";
const SEND_FAILED: &str = "Failed to send message. Please try again later.";
const METHOD_NOT_ALLOWED: &str = "Method not allowed";

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route(
            "/api/mail",
            routing::post(send_message).fallback(method_not_allowed),
        )
        .with_state(service)
}

async fn send_message(service: State<Arc<impl ContactFeatureService>>, body: Bytes) -> Response {
    let value = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => value,
        Err(err) => {
            error!("Failed to parse contact form body: {err}");
            return error(StatusCode::INTERNAL_SERVER_ERROR, SEND_FAILED);
        }
    };

    let Some(submission) = ContactSubmission::validate(&value) else {
        return error(StatusCode::BAD_REQUEST, INVALID_FORM_DATA);
    };

    match service.send_message(submission).await {
        Ok(()) => Json(ApiResponse {
            success: true,
            message: SENT,
        })
        .into_response(),
        Err(err) => error(StatusCode::INTERNAL_SERVER_ERROR, failure_message(err)),
    }
}

fn failure_message(err: ContactSendMessageError) -> &'static str {
    match err {
        ContactSendMessageError::Configuration => CONFIGURATION_ERROR,
        ContactSendMessageError::Verification => VERIFICATION_ERROR,
        ContactSendMessageError::Authentication => AUTHENTICATION_ERROR,
        ContactSendMessageError::Network => NETWORK_ERROR,
        ContactSendMessageError::Send => SEND_FAILED,
        ContactSendMessageError::Other(err) => {
            error!("Failed to send contact message: {err:#}");
            SEND_FAILED
        }
    }
}

async fn method_not_allowed() -> Response {
    error(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED)
}
