use crate::{
    application::{
        list_submissions::dto::AdminSubmissionPage,
        moderation::dto::{CaptionUpdated, EditCaptionRequest, ModerationOutcome},
    },
    domain::submission::entity::SubmissionStatus,
    infrastructure::auth::AdminIdentity,
    presentation::http::{
        errors::AppError,
        handlers::{CursorQuery, cursor_param, parse_id},
        state::AppState,
    },
};
use axum::{
    Json,
    extract::{
        Extension, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};

async fn list_by_status(
    state: &AppState,
    status: SubmissionStatus,
    query: Result<Query<CursorQuery>, QueryRejection>,
) -> Result<Json<AdminSubmissionPage>, AppError> {
    let cursor = cursor_param(query);
    let page = state
        .listings()
        .admin_list(status, cursor.as_deref())
        .await?;
    Ok(Json(page))
}

pub async fn list_pending(
    State(state): State<AppState>,
    query: Result<Query<CursorQuery>, QueryRejection>,
) -> Result<Json<AdminSubmissionPage>, AppError> {
    list_by_status(&state, SubmissionStatus::Pending, query).await
}

pub async fn list_approved(
    State(state): State<AppState>,
    query: Result<Query<CursorQuery>, QueryRejection>,
) -> Result<Json<AdminSubmissionPage>, AppError> {
    list_by_status(&state, SubmissionStatus::Approved, query).await
}

pub async fn list_rejected(
    State(state): State<AppState>,
    query: Result<Query<CursorQuery>, QueryRejection>,
) -> Result<Json<AdminSubmissionPage>, AppError> {
    list_by_status(&state, SubmissionStatus::Rejected, query).await
}

pub async fn approve_submission(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<String>,
) -> Result<Json<ModerationOutcome>, AppError> {
    let outcome = state.moderation().approve(parse_id(&id)?, &admin.id).await?;
    Ok(Json(outcome))
}

pub async fn reject_submission(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<String>,
) -> Result<Json<ModerationOutcome>, AppError> {
    let outcome = state.moderation().reject(parse_id(&id)?, &admin.id).await?;
    Ok(Json(outcome))
}

pub async fn delete_submission(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<String>,
) -> Result<Json<ModerationOutcome>, AppError> {
    let outcome = state.moderation().delete(parse_id(&id)?, &admin.id).await?;
    Ok(Json(outcome))
}

pub async fn edit_caption(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EditCaptionRequest>, JsonRejection>,
) -> Result<Json<CaptionUpdated>, AppError> {
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    let updated = state.moderation().edit_caption(id, &body.caption).await?;
    Ok(Json(updated))
}
