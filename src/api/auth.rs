//! Auth flow controller.
//!
//! Drives sign-in, sign-up, and third-party sign-in against the auth
//! collaborator. Failures surface the collaborator's message verbatim and
//! leave the user anonymous; there is no retry logic.

use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use minijinja::context;
use serde::Deserialize;
use tracing::warn;

use crate::auth::{AuthProvider, OAuthProvider};

use super::routes::{page, AppState};
use super::session;

pub const SIGN_UP_NOTICE: &str = "Signup successful! Check your email to confirm.";

#[derive(Debug, Deserialize)]
pub struct AuthPageQuery {
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct OAuthForm {
    pub provider: String,
}

#[derive(Debug, Deserialize)]
pub struct EstablishSessionForm {
    pub access_token: String,
    pub expires_in: Option<u64>,
}

/// GET /auth - combined sign-in / sign-up page.
pub async fn auth_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthPageQuery>,
    headers: HeaderMap,
) -> Response {
    // Already signed in: straight to the task list.
    if session::current_user(&state, &headers).await.is_some() {
        return Redirect::to("/todos").into_response();
    }

    let mode = match query.mode.as_deref() {
        Some("sign_up") => "sign_up",
        _ => "sign_in",
    };
    page(&state, "auth.html", context! { mode })
}

/// POST /auth/sign-in - password sign-in.
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    match state
        .auth
        .sign_in_with_password(&form.email, &form.password)
        .await
    {
        Ok(signed_in) => {
            let cookie = session::session_cookie(&signed_in.access_token, signed_in.expires_in);
            ([(header::SET_COOKIE, cookie)], Redirect::to("/todos")).into_response()
        }
        Err(e) => {
            warn!("Sign-in failed for {}: {}", form.email, e);
            page(
                &state,
                "auth.html",
                context! { mode => "sign_in", error => e.message, email => form.email },
            )
        }
    }
}

/// POST /auth/sign-up - account creation.
///
/// Success does not authenticate: the page returns to sign-in mode with a
/// confirmation notice and cleared fields.
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    match state
        .auth
        .sign_up(&form.email, &form.password, &state.config.redirect_target())
        .await
    {
        Ok(()) => page(
            &state,
            "auth.html",
            context! { mode => "sign_in", notice => SIGN_UP_NOTICE },
        ),
        Err(e) => {
            warn!("Sign-up failed for {}: {}", form.email, e);
            page(
                &state,
                "auth.html",
                context! { mode => "sign_up", error => e.message, email => form.email },
            )
        }
    }
}

/// POST /auth/oauth - third-party sign-in.
///
/// Redirects into the collaborator's flow; the provider's redirect back to
/// the callback page is what ultimately establishes the session.
pub async fn oauth(State(state): State<Arc<AppState>>, Form(form): Form<OAuthForm>) -> Response {
    let Ok(provider) = form.provider.parse::<OAuthProvider>() else {
        return page(
            &state,
            "auth.html",
            context! { mode => "sign_in", error => format!("Unknown sign-in provider: {}", form.provider) },
        );
    };

    let url = state
        .auth
        .authorize_url(provider, &state.config.callback_target());
    Redirect::to(&url).into_response()
}

/// GET /auth/callback - OAuth fragment relay page.
pub async fn callback_page(State(state): State<Arc<AppState>>) -> Response {
    page(&state, "callback.html", context! {})
}

/// POST /auth/session - establish a session from a relayed token.
///
/// The cookie is only set for a token the collaborator recognizes.
pub async fn establish_session(
    State(state): State<Arc<AppState>>,
    Form(form): Form<EstablishSessionForm>,
) -> Response {
    match state.auth.get_user(&form.access_token).await {
        Ok(Some(_)) => {
            let cookie = session::session_cookie(&form.access_token, form.expires_in);
            ([(header::SET_COOKIE, cookie)], Redirect::to("/todos")).into_response()
        }
        Ok(None) => Redirect::to("/auth").into_response(),
        Err(e) => {
            warn!("Relayed token verification failed: {}", e);
            Redirect::to("/auth").into_response()
        }
    }
}

/// POST /auth/sign-out - revoke the token and clear the cookie.
pub async fn sign_out(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = session::session_token(&headers) {
        // Revocation failure is logged, never surfaced; the cookie goes away
        // regardless.
        if let Err(e) = state.auth.sign_out(&token).await {
            warn!("Sign-out against auth collaborator failed: {}", e);
        }
    }
    (
        [(header::SET_COOKIE, session::clear_session_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}
