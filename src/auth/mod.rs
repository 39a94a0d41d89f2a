//! Auth collaborator clients.
//!
//! Authentication is owned entirely by the external auth service (GoTrue).
//! This module defines the [`AuthProvider`] seam plus two backends:
//! - [`GoTrueClient`]: the hosted Supabase auth API
//! - [`DevAuth`]: fixed identity for running without a project (dev mode)

mod dev;
mod error;
mod gotrue;

pub use dev::DevAuth;
pub use error::AuthError;
pub use gotrue::GoTrueClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated identity of the current user.
///
/// Issued by the auth collaborator; held only for the lifetime of a browser
/// session and re-queried on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Scoping handle for repository calls.
///
/// Bundles the verified user id with the access token it was verified
/// against, so every store call is both owner-filtered and made with the
/// user's own credentials. Fields are private: the only way to address the
/// task repository is through a handle derived from a real session.
#[derive(Debug, Clone)]
pub struct Owner {
    user_id: Uuid,
    access_token: String,
}

impl Owner {
    pub fn new(session: &Session, access_token: impl Into<String>) -> Self {
        Self {
            user_id: session.user_id,
            access_token: access_token.into(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

/// Result of a successful password sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub access_token: String,
    /// Token lifetime in seconds, when the collaborator reports one
    pub expires_in: Option<u64>,
    pub session: Session,
}

/// Third-party sign-in providers offered on the auth page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Github,
    Google,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Google => "google",
        }
    }
}

impl std::str::FromStr for OAuthProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Self::Github),
            "google" => Ok(Self::Google),
            _ => Err(()),
        }
    }
}

/// Auth collaborator interface.
///
/// Each call is a single round trip; a failed attempt reports and waits for
/// the user to resubmit (no retries).
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve an access token to the identity it belongs to.
    ///
    /// Returns `Ok(None)` for an absent, expired, or revoked token.
    async fn get_user(&self, access_token: &str) -> Result<Option<Session>, AuthError>;

    /// Password sign-in. On success the caller establishes the session.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignedIn, AuthError>;

    /// Account creation. Success does not authenticate: the collaborator
    /// sends a confirmation email linking back to `redirect_to`.
    async fn sign_up(&self, email: &str, password: &str, redirect_to: &str)
        -> Result<(), AuthError>;

    /// URL of the collaborator's redirect-based OAuth flow. The provider's
    /// redirect back to `redirect_to` is what establishes the session.
    fn authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> String;

    /// Revoke the token at the collaborator.
    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;
}
