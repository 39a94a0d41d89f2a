//! GoTrue client for the Supabase auth API.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use super::{AuthError, AuthProvider, OAuthProvider, Session, SignedIn};

/// Client for the hosted GoTrue auth endpoints.
pub struct GoTrueClient {
    client: Client,
    url: String,
    anon_key: String,
}

/// User object as GoTrue returns it.
#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: Uuid,
    email: Option<String>,
}

impl From<GoTrueUser> for Session {
    fn from(user: GoTrueUser) -> Self {
        Self {
            user_id: user.id,
            email: user.email.filter(|e| !e.is_empty()),
        }
    }
}

/// Response of the password-grant token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
    user: GoTrueUser,
}

impl GoTrueClient {
    /// Create a new GoTrue client.
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    /// Get the GoTrue base URL.
    fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url)
    }
}

#[async_trait::async_trait]
impl AuthProvider for GoTrueClient {
    async fn get_user(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
        let resp = self
            .client
            .get(format!("{}/user", self.auth_url()))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(AuthError::network)?;

        let status = resp.status();
        // Invalid or expired tokens are "no session", not an error.
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(None);
        }

        let text = resp.text().await.map_err(AuthError::network)?;
        if !status.is_success() {
            return Err(AuthError::from_response(status.as_u16(), &text));
        }

        let user: GoTrueUser = serde_json::from_str(&text).map_err(AuthError::parse)?;
        Ok(Some(user.into()))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignedIn, AuthError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let resp = self
            .client
            .post(format!("{}/token?grant_type=password", self.auth_url()))
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(AuthError::network)?;

        let status = resp.status();
        let text = resp.text().await.map_err(AuthError::network)?;

        if !status.is_success() {
            return Err(AuthError::from_response(status.as_u16(), &text));
        }

        let token: TokenResponse = serde_json::from_str(&text).map_err(AuthError::parse)?;
        Ok(SignedIn {
            access_token: token.access_token,
            expires_in: token.expires_in,
            session: token.user.into(),
        })
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: &str,
    ) -> Result<(), AuthError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        // redirect_to lands in the confirmation email link.
        let resp = self
            .client
            .post(format!(
                "{}/signup?redirect_to={}",
                self.auth_url(),
                urlencoding::encode(redirect_to)
            ))
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(AuthError::network)?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.map_err(AuthError::network)?;
            return Err(AuthError::from_response(status.as_u16(), &text));
        }

        Ok(())
    }

    fn authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> String {
        format!(
            "{}/authorize?provider={}&redirect_to={}",
            self.auth_url(),
            provider.as_str(),
            urlencoding::encode(redirect_to)
        )
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(format!("{}/logout", self.auth_url()))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(AuthError::network)?;

        let status = resp.status();
        // A token the service no longer recognizes is already signed out.
        if status == StatusCode::UNAUTHORIZED {
            return Ok(());
        }
        if !status.is_success() {
            let text = resp.text().await.map_err(AuthError::network)?;
            return Err(AuthError::from_response(status.as_u16(), &text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_encodes_redirect() {
        let client = GoTrueClient::new("https://proj.supabase.co/", "anon");
        let url = client.authorize_url(OAuthProvider::Github, "http://localhost:3000/auth/callback");
        assert_eq!(
            url,
            "https://proj.supabase.co/auth/v1/authorize?provider=github&redirect_to=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fcallback"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = GoTrueClient::new("https://proj.supabase.co///", "anon");
        assert_eq!(client.auth_url(), "https://proj.supabase.co/auth/v1");
    }

    #[test]
    fn test_session_from_user_drops_empty_email() {
        let user = GoTrueUser {
            id: Uuid::nil(),
            email: Some(String::new()),
        };
        let session: Session = user.into();
        assert!(session.email.is_none());
    }
}
