//! wfh-ui library - weekly work-from-home selection web service
//!
//! Serves the selection form and a small JSON API over the selection ledger.

use axum::Router;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use wfh_common::SelectionService;

pub mod api;

/// Source of the current local time
pub type Clock = fn() -> NaiveDateTime;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Ledger, store and admin operations
    pub service: Arc<SelectionService>,
    /// Current time; replaceable for tests
    pub clock: Clock,
}

impl AppState {
    /// Create new application state using the system clock
    pub fn new(service: Arc<SelectionService>) -> Self {
        Self {
            service,
            clock: wfh_common::time::now,
        }
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        // UI
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        // Service info
        .route("/health", get(api::health_check))
        .route("/api/buildinfo", get(api::get_build_info))
        // Selections
        .route("/api/roster", get(api::get_roster))
        .route("/api/week", get(api::get_week))
        .route(
            "/api/selections",
            get(api::list_selections).post(api::submit_selection),
        )
        .route("/api/export", get(api::export_selections))
        // Admin
        .route("/api/admin/reset", post(api::reset_selections))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
