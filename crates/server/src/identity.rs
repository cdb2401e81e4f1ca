//! Request identity extraction.
//!
//! The subscriber cookie's presence selects the subscriber tier; its value
//! is opaque. Anonymous requests fall back to the client IP as reported by
//! the usual proxy headers.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use leafkit_core::Identity;

/// Identity for general tool usage: subscriber token if the cookie is
/// present, client IP otherwise.
pub fn client_identity(headers: &HeaderMap, subscriber_cookie: &str) -> Identity {
    if let Some(token) = cookie_value(headers, subscriber_cookie) {
        return Identity::Subscriber(token);
    }
    Identity::Ip(client_ip(headers))
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .unwrap_or("unknown")
        .trim()
        .to_string()
}
