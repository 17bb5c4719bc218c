//! HTTP API handlers for wfh-ui

mod admin;
mod buildinfo;
mod error;
mod export;
mod health;
mod selections;
mod ui;

pub use admin::reset_selections;
pub use buildinfo::get_build_info;
pub use error::ApiError;
pub use export::export_selections;
pub use health::health_check;
pub use selections::{get_roster, get_week, list_selections, submit_selection};
pub use ui::{serve_app_js, serve_index};

/// Run a blocking store operation off the async runtime
async fn run_blocking<T, F>(operation: F) -> Result<T, ApiError>
where
    F: FnOnce() -> wfh_common::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|e| ApiError::from(wfh_common::Error::Internal(format!("Task failed: {}", e))))?
        .map_err(ApiError::from)
}
