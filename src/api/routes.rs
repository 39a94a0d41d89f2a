//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use minijinja::context;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthProvider, DevAuth, GoTrueClient};
use crate::config::Config;
use crate::store::{InMemoryTaskStore, SupabaseTaskStore, TaskStore};
use crate::views::Views;

use super::auth as auth_api;
use super::session;
use super::todos;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Auth collaborator
    pub auth: Arc<dyn AuthProvider>,
    /// Task repository
    pub tasks: Arc<dyn TaskStore>,
    /// Compiled templates
    pub views: Views,
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let (auth, tasks): (Arc<dyn AuthProvider>, Arc<dyn TaskStore>) = if config.dev_mode {
        tracing::warn!("DEV_MODE enabled: any credentials sign in as the dev user, tasks are not persisted");
        (Arc::new(DevAuth::new()), Arc::new(InMemoryTaskStore::new()))
    } else {
        let (url, key) = match (
            config.supabase_url.as_deref(),
            config.supabase_anon_key.as_deref(),
        ) {
            (Some(url), Some(key)) => (url, key),
            _ => anyhow::bail!("SUPABASE_URL and SUPABASE_ANON_KEY are required outside dev mode"),
        };
        (
            Arc::new(GoTrueClient::new(url, key)),
            Arc::new(SupabaseTaskStore::new(url, key)),
        )
    };

    let views = Views::new()?;

    let state = Arc::new(AppState {
        config: config.clone(),
        auth,
        tasks,
        views,
    });

    let app = Router::new()
        .route("/", get(landing))
        .route("/auth", get(auth_api::auth_page))
        .route("/auth/sign-in", post(auth_api::sign_in))
        .route("/auth/sign-up", post(auth_api::sign_up))
        .route("/auth/oauth", post(auth_api::oauth))
        .route("/auth/callback", get(auth_api::callback_page))
        .route("/auth/session", post(auth_api::establish_session))
        .route("/auth/sign-out", post(auth_api::sign_out))
        .route("/todos", get(todos::todos_page))
        .route("/todos", post(todos::create_task))
        .route("/todos/:id/toggle", post(todos::toggle_task))
        .route("/todos/:id/delete", post(todos::delete_task))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::clone(&state));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// GET / - marketing landing page.
///
/// Checks the session only to pick the call-to-action; no data access.
async fn landing(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let signed_in = session::current_user(&state, &headers).await.is_some();
    page(&state, "landing.html", context! { signed_in })
}

/// GET /api/health - health check.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Render a template into a response; template failures are a 500.
pub(crate) fn page(state: &AppState, template: &str, ctx: minijinja::Value) -> Response {
    match state.views.render(template, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render {}: {}", template, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
        }
    }
}

/// Wait for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
