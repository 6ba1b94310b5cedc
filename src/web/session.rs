use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "sommelier_session";
const MAX_SESSION_ID_LEN: usize = 64;

/// Identifies the browser session a request belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Attaches a [`SessionId`] to every request, issuing a new cookie when the
/// browser did not send a usable one.
pub async fn ensure_session(mut request: Request, next: Next) -> Response {
    let (id, is_new) = match session_from_headers(request.headers()) {
        Some(id) => (id, false),
        None => (Uuid::new_v4().to_string(), true),
    };

    if is_new {
        tracing::debug!("Starting new session {}", id);
    }
    request.extensions_mut().insert(SessionId(id.clone()));

    let mut response = next.run(request).await;

    if is_new {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

pub fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| is_valid_session_id(value))
}

fn is_valid_session_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_SESSION_ID_LEN
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_reads_session_cookie_among_others() {
        let headers = headers_with_cookie("theme=dark; sommelier_session=abc-123; lang=en");
        assert_eq!(session_from_headers(&headers), Some("abc-123".to_string()));
    }

    #[test]
    fn test_missing_or_invalid_cookie() {
        assert_eq!(session_from_headers(&HeaderMap::new()), None);
        assert_eq!(
            session_from_headers(&headers_with_cookie("sommelier_session=")),
            None
        );
        assert_eq!(
            session_from_headers(&headers_with_cookie("sommelier_session=a\"b")),
            None
        );
        let too_long = format!("sommelier_session={}", "a".repeat(65));
        assert_eq!(session_from_headers(&headers_with_cookie(&too_long)), None);
    }
}
