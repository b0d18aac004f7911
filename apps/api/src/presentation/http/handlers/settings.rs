use crate::{
    application::moderation::dto::UpdateSettingsRequest,
    domain::settings::entity::AppSettings,
    infrastructure::auth::AdminIdentity,
    presentation::http::{errors::AppError, state::AppState},
};
use axum::{
    Json,
    extract::{Extension, State, rejection::JsonRejection},
};
use tracing::info;

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<AppSettings>, AppError> {
    Ok(Json(state.moderation().settings().await?))
}

pub async fn put_settings(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    payload: Result<Json<UpdateSettingsRequest>, JsonRejection>,
) -> Result<Json<AppSettings>, AppError> {
    let Json(body) = payload?;
    let settings = state
        .moderation()
        .update_settings(body.approvals_enabled)
        .await?;
    info!(admin = %admin.id, approvals_enabled = settings.approvals_enabled, "Settings changed");
    Ok(Json(settings))
}
