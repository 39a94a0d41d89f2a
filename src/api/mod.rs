//! HTTP surface for TaskFlow.
//!
//! ## Endpoints
//!
//! - `GET /` - Landing page (session-aware call-to-action)
//! - `GET /auth` - Combined sign-in / sign-up page
//! - `POST /auth/sign-in` - Password sign-in
//! - `POST /auth/sign-up` - Account creation (email confirmation flow)
//! - `POST /auth/oauth` - Third-party sign-in redirect
//! - `GET /auth/callback` - OAuth fragment relay page
//! - `POST /auth/session` - Establish a session from a relayed token
//! - `POST /auth/sign-out` - Sign out
//! - `GET /todos` - Task list
//! - `POST /todos` - Create a task
//! - `POST /todos/:id/toggle` - Set a task's completed flag
//! - `POST /todos/:id/delete` - Delete a task
//! - `GET /api/health` - Health check

mod auth;
mod routes;
pub mod session;
mod todos;

pub use routes::{serve, AppState};

#[cfg(test)]
pub(crate) mod testutil {
    //! Scripted collaborator fakes for handler tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::auth::{AuthError, AuthProvider, OAuthProvider, Owner, Session, SignedIn};
    use crate::config::Config;
    use crate::store::{InMemoryTaskStore, StoreError, Task, TaskStore};
    use crate::views::Views;

    use super::AppState;

    /// Token the fake auth provider resolves to a session.
    pub const VALID_TOKEN: &str = "valid-token";

    /// Auth provider with scripted outcomes.
    #[derive(Default)]
    pub struct FakeAuth {
        /// Session behind [`VALID_TOKEN`]; `None` means no valid session exists
        pub user: Option<Session>,
        /// When set, password sign-in fails with this message
        pub sign_in_error: Option<String>,
        /// When set, sign-up fails with this message
        pub sign_up_error: Option<String>,
    }

    impl FakeAuth {
        pub fn signed_in() -> (Self, Session) {
            let session = Session {
                user_id: Uuid::new_v4(),
                email: Some("user@example.com".to_string()),
            };
            (
                Self {
                    user: Some(session.clone()),
                    ..Self::default()
                },
                session,
            )
        }
    }

    #[async_trait::async_trait]
    impl AuthProvider for FakeAuth {
        async fn get_user(&self, access_token: &str) -> Result<Option<Session>, AuthError> {
            if access_token == VALID_TOKEN {
                Ok(self.user.clone())
            } else {
                Ok(None)
            }
        }

        async fn sign_in_with_password(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<SignedIn, AuthError> {
            if let Some(message) = &self.sign_in_error {
                return Err(AuthError {
                    status: Some(400),
                    message: message.clone(),
                });
            }
            let session = self.user.clone().expect("FakeAuth needs a user to sign in");
            Ok(SignedIn {
                access_token: VALID_TOKEN.to_string(),
                expires_in: Some(3600),
                session,
            })
        }

        async fn sign_up(
            &self,
            _email: &str,
            _password: &str,
            _redirect_to: &str,
        ) -> Result<(), AuthError> {
            match &self.sign_up_error {
                Some(message) => Err(AuthError {
                    status: Some(422),
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }

        fn authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> String {
            format!("fake://{}?redirect_to={}", provider.as_str(), redirect_to)
        }

        async fn sign_out(&self, _access_token: &str) -> Result<(), AuthError> {
            Ok(())
        }
    }

    /// In-memory store that counts every repository call.
    #[derive(Default)]
    pub struct CountingStore {
        pub inner: InMemoryTaskStore,
        pub lists: AtomicUsize,
        pub creates: AtomicUsize,
        pub updates: AtomicUsize,
        pub removes: AtomicUsize,
    }

    impl CountingStore {
        pub fn total_calls(&self) -> usize {
            self.lists.load(Ordering::SeqCst)
                + self.creates.load(Ordering::SeqCst)
                + self.updates.load(Ordering::SeqCst)
                + self.removes.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl TaskStore for CountingStore {
        async fn list(&self, owner: &Owner) -> Result<Vec<Task>, StoreError> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            self.inner.list(owner).await
        }

        async fn create(&self, owner: &Owner, title: &str) -> Result<(), StoreError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.inner.create(owner, title).await
        }

        async fn set_completed(
            &self,
            owner: &Owner,
            id: i64,
            completed: bool,
        ) -> Result<(), StoreError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.inner.set_completed(owner, id, completed).await
        }

        async fn remove(&self, owner: &Owner, id: i64) -> Result<(), StoreError> {
            self.removes.fetch_add(1, Ordering::SeqCst);
            self.inner.remove(owner, id).await
        }
    }

    /// Assemble an app state around fake collaborators.
    pub fn state(auth: Arc<dyn AuthProvider>, tasks: Arc<dyn TaskStore>) -> Arc<AppState> {
        Arc::new(AppState {
            config: Config::dev(),
            auth,
            tasks,
            views: Views::new().expect("templates compile"),
        })
    }

    /// Headers carrying the session cookie for `token`.
    pub fn cookie_headers(token: &str) -> axum::http::HeaderMap {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            format!("{}={}", super::session::SESSION_COOKIE, token)
                .parse()
                .unwrap(),
        );
        headers
    }

    /// Collect a response body as text.
    pub async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}
