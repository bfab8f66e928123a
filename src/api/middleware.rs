use crate::error::ErrorCode;
use axum::body::Bytes;
use axum::http::{HeaderValue, Request, Response, StatusCode, header};
use http_body_util::Full;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Reuses an inbound `x-request-id` when present, otherwise mints a UUID.
#[derive(Clone, Copy, Debug)]
pub struct MakeRequestUuidOrHeader;

impl MakeRequestId for MakeRequestUuidOrHeader {
    fn make_request_id<B>(&mut self, request: &Request<B>) -> Option<RequestId> {
        if let Some(id) = request.headers().get("x-request-id") {
            return Some(RequestId::new(id.clone()));
        }

        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Maps a panicking handler to the generic internal-error envelope.
///
/// Rate limit headers are intentionally absent here: the request never made
/// it through the pipeline, so there is no decision to report.
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response<Full<Bytes>> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "request handler panicked");

    let code = ErrorCode::InternalError;
    let body = serde_json::json!({
        "success": false,
        "error": { "code": code.as_str(), "message": code.user_message() },
    });

    let mut response = Response::new(Full::from(body.to_string()));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
