//! Task list view-controller.
//!
//! Every request re-resolves the session first; anonymous requests go back
//! to the landing page without touching the repository. Every mutation
//! answers a 303 back to the list, whose GET is the full server-confirmed
//! refresh.

use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use minijinja::context;
use serde::Deserialize;
use tracing::warn;

use crate::store::TaskStore;

use super::routes::{page, AppState};
use super::session::{self, CurrentUser};

#[derive(Debug, Deserialize)]
pub struct CreateForm {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub completed: bool,
}

/// GET /todos - the task list.
pub async fn todos_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let Some(user) = session::current_user(&state, &headers).await else {
        return Redirect::to("/").into_response();
    };
    render_list(&state, &user, None).await
}

/// POST /todos - create a task.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<CreateForm>,
) -> Response {
    let Some(user) = session::current_user(&state, &headers).await else {
        return Redirect::to("/").into_response();
    };

    let title = form.title.trim();
    if title.is_empty() {
        // Nothing to insert; back to the list.
        return Redirect::to("/todos").into_response();
    }

    if let Err(e) = state.tasks.create(&user.owner(), title).await {
        warn!("Task create failed: {}", e);
        return render_list(&state, &user, Some(e.message)).await;
    }

    Redirect::to("/todos").into_response()
}

/// POST /todos/:id/toggle - set a task's completed flag.
pub async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Form(form): Form<ToggleForm>,
) -> Response {
    let Some(user) = session::current_user(&state, &headers).await else {
        return Redirect::to("/").into_response();
    };

    // Toggle failures are logged, not surfaced.
    if let Err(e) = state
        .tasks
        .set_completed(&user.owner(), id, form.completed)
        .await
    {
        warn!("Task toggle failed for id {}: {}", id, e);
    }

    Redirect::to("/todos").into_response()
}

/// POST /todos/:id/delete - delete a task.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let Some(user) = session::current_user(&state, &headers).await else {
        return Redirect::to("/").into_response();
    };

    // Delete failures are logged, not surfaced.
    if let Err(e) = state.tasks.remove(&user.owner(), id).await {
        warn!("Task delete failed for id {}: {}", id, e);
    }

    Redirect::to("/todos").into_response()
}

/// Fetch the owner's full task list and render the page.
///
/// Read failures degrade to an empty list behind an explicit error banner.
async fn render_list(state: &AppState, user: &CurrentUser, action_error: Option<String>) -> Response {
    let (tasks, load_error) = match state.tasks.list(&user.owner()).await {
        Ok(tasks) => (tasks, None),
        Err(e) => {
            warn!("Task list fetch failed: {}", e);
            (
                Vec::new(),
                Some("Could not load your tasks. Please try again.".to_string()),
            )
        }
    };

    let completed_count = tasks.iter().filter(|t| t.completed).count();
    let percentage = completion_percentage(completed_count, tasks.len());

    page(
        state,
        "todos.html",
        context! {
            email => user.session.email.clone().unwrap_or_default(),
            total => tasks.len(),
            tasks,
            completed_count,
            percentage,
            load_error,
            action_error,
        },
    )
}

/// Share of completed tasks as a whole percentage; 0 for an empty list.
fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testutil::{body_text, cookie_headers, state, CountingStore, FakeAuth, VALID_TOKEN};
    use crate::auth::Owner;
    use axum::http::{header, StatusCode};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    #[test]
    fn test_completion_percentage_guards_empty_list() {
        assert_eq!(completion_percentage(0, 0), 0);
    }

    #[test]
    fn test_completion_percentage_rounds() {
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(1, 2), 50);
        assert_eq!(completion_percentage(3, 3), 100);
    }

    #[tokio::test]
    async fn test_anonymous_list_redirects_without_touching_repository() {
        let store = Arc::new(CountingStore::default());
        let state = state(Arc::new(FakeAuth::default()), store.clone());

        let resp = todos_page(State(state), HeaderMap::new()).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
        assert_eq!(store.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_expired_token_redirects_without_touching_repository() {
        let store = Arc::new(CountingStore::default());
        // FakeAuth with no user: even the "valid" token resolves to nothing.
        let state = state(Arc::new(FakeAuth::default()), store.clone());

        let resp = todos_page(State(state), cookie_headers(VALID_TOKEN)).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(store.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_title_never_reaches_insert() {
        let (auth, _) = FakeAuth::signed_in();
        let store = Arc::new(CountingStore::default());
        let state = state(Arc::new(auth), store.clone());

        let resp = create_task(
            State(state),
            cookie_headers(VALID_TOKEN),
            Form(CreateForm {
                title: "   \t ".to_string(),
            }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/todos");
        assert_eq!(store.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_inserts_trimmed_title_and_redirects() {
        let (auth, session) = FakeAuth::signed_in();
        let store = Arc::new(CountingStore::default());
        let state = state(Arc::new(auth), store.clone());

        let resp = create_task(
            State(state),
            cookie_headers(VALID_TOKEN),
            Form(CreateForm {
                title: "  Buy milk  ".to_string(),
            }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let owner = Owner::new(&session, VALID_TOKEN);
        let tasks = store.inner.list(&owner).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy milk");
        assert!(!tasks[0].completed);
    }

    #[tokio::test]
    async fn test_list_renders_counts_and_percentage() {
        let (auth, session) = FakeAuth::signed_in();
        let store = Arc::new(CountingStore::default());
        let owner = Owner::new(&session, VALID_TOKEN);
        store.inner.create(&owner, "one").await.unwrap();
        store.inner.create(&owner, "two").await.unwrap();
        let id = store.inner.list(&owner).await.unwrap()[0].id;
        store.inner.set_completed(&owner, id, true).await.unwrap();
        let state = state(Arc::new(auth), store);

        let resp = todos_page(State(state), cookie_headers(VALID_TOKEN)).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_text(resp).await;
        assert!(body.contains("1 of 2 completed"));
        assert!(body.contains("50% complete"));
        assert!(body.contains("user@example.com"));
    }

    #[tokio::test]
    async fn test_toggle_then_delete_round_trip() {
        let (auth, session) = FakeAuth::signed_in();
        let store = Arc::new(CountingStore::default());
        let owner = Owner::new(&session, VALID_TOKEN);
        store.inner.create(&owner, "Buy milk").await.unwrap();
        let id = store.inner.list(&owner).await.unwrap()[0].id;
        let state = state(Arc::new(auth), store.clone());

        let resp = toggle_task(
            State(state.clone()),
            Path(id),
            cookie_headers(VALID_TOKEN),
            Form(ToggleForm { completed: true }),
        )
        .await;
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/todos");
        assert!(store.inner.list(&owner).await.unwrap()[0].completed);

        let resp = delete_task(State(state), Path(id), cookie_headers(VALID_TOKEN)).await;
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/todos");
        assert!(store.inner.list(&owner).await.unwrap().is_empty());
    }
}
