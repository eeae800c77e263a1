//! Router configuration for the foyer web UI.

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    edit_profile, edit_profile_form, home, login, login_form, logout, profile, register,
    register_form, AppState,
};

/// Create the main application router.
///
/// Uploaded avatars are served from `/uploads`. The body limit caps avatar
/// uploads; oversized requests are rejected at the transport layer with 413.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(app_state.avatars.base_path());
    let max_body = app_state.max_upload_bytes;

    Router::new()
        .route("/", get(home))
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .route("/profile", get(profile))
        .route("/edit_profile", get(edit_profile_form).post(edit_profile))
        .nest_service("/uploads", uploads)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(max_body)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
