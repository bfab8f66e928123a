use crate::services::rate_limit_service::RateLimitDecision;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::Response;
use std::net::IpAddr;

/// Shared bucket for clients whose address cannot be determined at all.
pub const UNKNOWN_CLIENT_KEY: &str = "unknown";

/// Derives the rate limit key for a request.
///
/// Proxy headers are consulted first so the key survives a reverse proxy in
/// front of the service: the first (original client) entry of
/// `x-forwarded-for`, then `x-real-ip`. Headers are only meaningful behind a
/// proxy that strips inbound values; a direct client can spoof them. Absent
/// both, the peer address keeps un-proxied clients isolated per IP, and the
/// shared "unknown" bucket is the last resort.
pub fn client_key(headers: &HeaderMap, peer: Option<IpAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok())
        && let Some(first) = forwarded.split(',').map(str::trim).find(|s| !s.is_empty())
    {
        return first.to_owned();
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_owned();
        }
    }

    peer.map_or_else(|| UNKNOWN_CLIENT_KEY.to_owned(), |ip| ip.to_string())
}

/// Attaches the standard rate limit headers to an outgoing response.
pub fn with_rate_limit_headers(mut response: Response, limit: u32, decision: &RateLimitDecision) -> Response {
    let headers = response.headers_mut();
    headers.insert(HeaderName::from_static("x-ratelimit-limit"), HeaderValue::from(limit));
    headers.insert(HeaderName::from_static("x-ratelimit-remaining"), HeaderValue::from(decision.remaining));
    headers.insert(HeaderName::from_static("x-ratelimit-reset"), HeaderValue::from(decision.reset_time));
    response
}
