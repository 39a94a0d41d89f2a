//! Auth error type.
//!
//! The collaborator's human-readable message is kept verbatim so the auth
//! page can show exactly what the service said.

/// Error from auth collaborator calls.
#[derive(Debug, Clone)]
pub struct AuthError {
    /// HTTP status code, if the collaborator answered at all
    pub status: Option<u16>,
    /// Human-readable message, verbatim from the collaborator where possible
    pub message: String,
}

impl AuthError {
    /// Build an error from a non-success collaborator response.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self {
            status: Some(status),
            message: extract_message(body),
        }
    }

    /// Create a network error (connection failed, timeout).
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            message: format!("Could not reach the authentication service: {}", err),
        }
    }

    /// Create a response parse error.
    pub fn parse(err: impl std::fmt::Display) -> Self {
        Self {
            status: None,
            message: format!("Unexpected response from the authentication service: {}", err),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(code) => write!(f, "HTTP {}: {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for AuthError {}

/// Pull the human-readable message out of a GoTrue error body.
///
/// GoTrue has answered with several shapes over its versions:
/// `{"error_description": ...}`, `{"msg": ...}`, `{"message": ...}`, and
/// `{"error": ...}`. Falls back to the raw body.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Authentication request failed".to_string()
    } else {
        trimmed.to_string()
    }
}
