use super::{
    handlers::{admin, export, gallery, health, settings, submissions},
    middleware::{admin::require_admin, request_id::request_id_middleware},
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

/// Multipart framing and text fields on top of the photo itself.
const MULTIPART_OVERHEAD_BYTES: usize = 2 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/api/v1/admin/submissions/pending", get(admin::list_pending))
        .route("/api/v1/admin/submissions/approved", get(admin::list_approved))
        .route("/api/v1/admin/submissions/rejected", get(admin::list_rejected))
        .route(
            "/api/v1/admin/submissions/{id}/approve",
            post(admin::approve_submission),
        )
        .route(
            "/api/v1/admin/submissions/{id}/reject",
            post(admin::reject_submission),
        )
        .route(
            "/api/v1/admin/submissions/{id}/caption",
            patch(admin::edit_caption),
        )
        .route(
            "/api/v1/admin/submissions/{id}",
            delete(admin::delete_submission),
        )
        .route(
            "/api/v1/admin/settings",
            get(settings::get_settings).put(settings::put_settings),
        )
        .route("/api/v1/admin/export", get(export::export_csv))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let upload_routes = Router::new()
        .route("/api/v1/submissions", post(submissions::submit_photo))
        .layer(DefaultBodyLimit::max(
            state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/gallery", get(gallery::list_gallery))
        .route("/api/v1/photos/{id}", get(gallery::get_photo))
        .merge(upload_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
