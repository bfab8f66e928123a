use crate::api::AppState;
use crate::api::rate_limit::{client_key, with_rate_limit_headers};
use crate::api::schemas::contact::ContactSuccess;
use crate::domain::submission;
use crate::error::{ErrorCode, error_response};
use axum::{
    Json,
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tracing::{debug, error, info, warn};

/// Handles a contact form submission.
///
/// The rate limit decision is taken first and its headers ride on every
/// branch below, so a rejected client sees its remaining budget whether the
/// body was parseable or not.
pub async fn submit(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let client = client_key(&headers, Some(peer.ip()));
    let decision = state.rate_limit_service.check(&client);
    let limit = state.rate_limit_service.limit();

    if !decision.allowed {
        warn!(client = %client, reset_time = decision.reset_time, "contact submission rate limited");
        let code = ErrorCode::RateLimitExceeded;
        return with_rate_limit_headers(error_response(code, code.user_message(), None), limit, &decision);
    }

    let raw: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "contact submission body is not valid JSON");
            let response = error_response(ErrorCode::ValidationError, "Invalid JSON in request body", None);
            return with_rate_limit_headers(response, limit, &decision);
        }
    };

    let validated = match submission::validate(&raw) {
        Ok(validated) => validated,
        Err(errors) => {
            debug!(violations = errors.len(), "contact submission failed validation");
            let code = ErrorCode::ValidationError;
            let response = error_response(code, code.user_message(), Some(errors));
            return with_rate_limit_headers(response, limit, &decision);
        }
    };

    match state.contact_service.send_message(&validated).await {
        Ok(()) => {
            info!(client = %client, "contact message relayed");
            let body = ContactSuccess { success: true, message: "Message sent successfully" };
            with_rate_limit_headers((StatusCode::OK, Json(body)).into_response(), limit, &decision)
        }
        Err(e) => {
            error!(error = %e, client = %client, "contact delivery failed");
            let code = e.code();
            with_rate_limit_headers(error_response(code, code.user_message(), None), limit, &decision)
        }
    }
}

/// Terminal handler for every non-POST method on the contact route.
pub async fn method_not_allowed() -> Response {
    let code = ErrorCode::MethodNotAllowed;
    error_response(code, code.user_message(), None)
}
