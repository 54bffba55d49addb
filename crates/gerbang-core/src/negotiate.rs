//! Minimal content negotiation.

use axum::http::{HeaderMap, header::ACCEPT};

/// Returns `true` when the client asked for HTML ahead of JSON.
///
/// Browsers send `text/html` first; API clients usually send
/// `application/json` or nothing at all. Quality values are ignored and the
/// first listed type among the two wins.
pub fn prefers_html(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(ACCEPT).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    for media in accept.split(',') {
        let media = media.split(';').next().unwrap_or("").trim();
        match media {
            "text/html" | "application/xhtml+xml" => return true,
            "application/json" => return false,
            _ => {}
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(accept: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_str(accept).unwrap());
        headers
    }

    #[test]
    fn test_browser_accept_prefers_html() {
        assert!(prefers_html(&headers(
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
        )));
    }

    #[test]
    fn test_json_accept() {
        assert!(!prefers_html(&headers("application/json")));
        assert!(!prefers_html(&headers("application/json, text/html")));
    }

    #[test]
    fn test_missing_or_wildcard_accept() {
        assert!(!prefers_html(&HeaderMap::new()));
        assert!(!prefers_html(&headers("*/*")));
    }
}
