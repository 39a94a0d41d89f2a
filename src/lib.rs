//! # TaskFlow
//!
//! Server-rendered task manager backed by a hosted Supabase stack.
//!
//! This library provides:
//! - HTML pages for the landing, auth, and task-list views
//! - An auth-flow controller delegating to a hosted GoTrue API
//! - An owner-scoped task repository delegating to a hosted PostgREST API
//!
//! ## Architecture
//!
//! ```text
//!   Landing / Auth view
//!           │
//!           ▼
//!   Session accessor ──────► GoTrue  (external auth collaborator)
//!           │
//!           ▼
//!   Task list view-controller
//!           │
//!           ▼
//!   Task repository ───────► PostgREST (external data collaborator)
//! ```
//!
//! ## Request Flow
//! 1. Every view re-queries the session accessor (no local caching)
//! 2. Anonymous requests are redirected to the landing page
//! 3. Repository calls are scoped by a mandatory [`auth::Owner`] handle
//! 4. Every mutation answers a redirect back to the list, whose GET is the
//!    full server-confirmed refresh
//!
//! ## Modules
//! - `api`: HTTP routes, session accessor, auth flow, task list controller
//! - `auth`: auth collaborator clients (GoTrue + dev mode)
//! - `store`: task repository backends (PostgREST + in-memory)
//! - `views`: minijinja HTML templates

pub mod api;
pub mod auth;
pub mod config;
pub mod store;
pub mod views;

pub use config::Config;
