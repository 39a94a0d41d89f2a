//! Session accessor.
//!
//! The browser carries the collaborator-issued access token in an HttpOnly
//! cookie. There is no local session cache: every caller re-queries the auth
//! collaborator, and `None` always means "redirect to landing/auth."

use axum::http::{header, HeaderMap};
use tracing::warn;

use crate::auth::{AuthProvider, Owner, Session};

use super::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "tf_session";

/// A verified session together with the token it was verified against.
pub struct CurrentUser {
    pub session: Session,
    pub access_token: String,
}

impl CurrentUser {
    /// Scoping handle for repository calls.
    pub fn owner(&self) -> Owner {
        Owner::new(&self.session, &self.access_token)
    }
}

/// Resolve the request's session, if any.
///
/// Absent cookie, invalid or expired token, and collaborator errors (logged)
/// all come back as `None`.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<CurrentUser> {
    let token = session_token(headers)?;
    match state.auth.get_user(&token).await {
        Ok(Some(session)) => Some(CurrentUser {
            session,
            access_token: token,
        }),
        Ok(None) => None,
        Err(e) => {
            warn!("Session lookup failed: {}", e);
            None
        }
    }
}

/// Extract the session token from the `Cookie` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value establishing the session.
pub fn session_cookie(token: &str, max_age: Option<u64>) -> String {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, token);
    if let Some(seconds) = max_age {
        cookie.push_str(&format!("; Max-Age={}", seconds));
    }
    cookie
}

/// `Set-Cookie` value clearing the session.
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, cookie.parse().unwrap());
        headers
    }

    #[test]
    fn test_token_found_among_other_cookies() {
        let headers = headers("theme=dark; tf_session=abc123; _ga=GA1.2");
        assert_eq!(session_token(&headers), Some("abc123".to_string()));
    }

    #[test]
    fn test_no_cookie_header() {
        assert_eq!(session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_empty_value_is_no_session() {
        let headers = headers("tf_session=");
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_unrelated_cookies_ignored() {
        let headers = headers("tf_session_old=zzz; theme=dark");
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", Some(3600));
        assert!(cookie.starts_with("tf_session=tok; "));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));

        let cleared = clear_session_cookie();
        assert!(cleared.contains("Max-Age=0"));
    }
}
