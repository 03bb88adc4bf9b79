//! Attribution metadata pulled from request headers for click recording.

use axum::http::{HeaderMap, header};

/// Sentinel recorded when a client attribute cannot be derived.
pub const UNKNOWN: &str = "Unknown";

/// First `x-forwarded-for` hop, else `x-real-ip`, else the sentinel.
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_owned();
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| UNKNOWN.to_owned())
}

pub fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| UNKNOWN.to_owned())
}

pub fn referrer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn forwarded_for_takes_the_first_hop() {
        let map = headers(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1")]);
        assert_eq!(client_ip(&map), "203.0.113.7");
    }

    #[test]
    fn real_ip_is_the_fallback() {
        let map = headers(&[("x-real-ip", "203.0.113.9")]);
        assert_eq!(client_ip(&map), "203.0.113.9");
    }

    #[test]
    fn missing_ip_headers_yield_the_sentinel() {
        assert_eq!(client_ip(&HeaderMap::new()), UNKNOWN);
    }

    #[test]
    fn empty_forwarded_for_falls_through() {
        let map = headers(&[("x-forwarded-for", ""), ("x-real-ip", "203.0.113.9")]);
        assert_eq!(client_ip(&map), "203.0.113.9");
    }

    #[test]
    fn user_agent_defaults_to_the_sentinel() {
        assert_eq!(user_agent(&HeaderMap::new()), UNKNOWN);
        let map = headers(&[("user-agent", "curl/8.5.0")]);
        assert_eq!(user_agent(&map), "curl/8.5.0");
    }

    #[test]
    fn referrer_is_optional() {
        assert_eq!(referrer(&HeaderMap::new()), None);
        let map = headers(&[("referer", "https://example.com/page")]);
        assert_eq!(referrer(&map).as_deref(), Some("https://example.com/page"));
    }
}
