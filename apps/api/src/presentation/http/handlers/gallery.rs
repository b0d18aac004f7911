use crate::{
    application::list_submissions::dto::{GalleryPage, PhotoDetail},
    presentation::http::{
        errors::AppError,
        handlers::{CursorQuery, cursor_param, parse_id},
        state::AppState,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};

/// Approved photos, newest first, 20 per page.
pub async fn list_gallery(
    State(state): State<AppState>,
    query: Result<Query<CursorQuery>, QueryRejection>,
) -> Result<Json<GalleryPage>, AppError> {
    let cursor = cursor_param(query);
    let page = state.listings().gallery(cursor.as_deref()).await?;
    Ok(Json(page))
}

pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PhotoDetail>, AppError> {
    let photo = state.listings().get_photo(parse_id(&id)?).await?;
    Ok(Json(photo))
}
