//! Dev-mode auth provider (no Supabase project).
//!
//! Any submitted credentials sign in as a single fixed identity. The OAuth
//! flow short-circuits to the callback page with the dev token in the URL
//! fragment, so the full session-establishment path still runs locally.

use uuid::Uuid;

use super::{AuthError, AuthProvider, OAuthProvider, Session, SignedIn};

/// The one access token dev mode recognizes.
pub const DEV_ACCESS_TOKEN: &str = "dev-access-token";

/// Fixed-identity auth provider for dev mode.
pub struct DevAuth {
    session: Session,
}

impl DevAuth {
    pub fn new() -> Self {
        Self {
            session: Session {
                user_id: Uuid::nil(),
                email: Some("dev@taskflow.local".to_string()),
            },
        }
    }
}

impl Default for DevAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AuthProvider for DevAuth {
    async fn get_user(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
        if access_token == DEV_ACCESS_TOKEN {
            Ok(Some(self.session.clone()))
        } else {
            Ok(None)
        }
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<SignedIn, AuthError> {
        Ok(SignedIn {
            access_token: DEV_ACCESS_TOKEN.to_string(),
            expires_in: None,
            session: self.session.clone(),
        })
    }

    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _redirect_to: &str,
    ) -> Result<(), AuthError> {
        Ok(())
    }

    fn authorize_url(&self, _provider: OAuthProvider, redirect_to: &str) -> String {
        format!("{}#access_token={}", redirect_to, DEV_ACCESS_TOKEN)
    }

    async fn sign_out(&self, _access_token: &str) -> Result<(), AuthError> {
        Ok(())
    }
}
