use crate::presentation::http::{errors::AppError, state::AppState};
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

pub const EXPORT_FILENAME: &str = "gallery-export.csv";

pub async fn export_csv(State(state): State<AppState>) -> Result<Response, AppError> {
    let csv = state.export().execute().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        csv,
    )
        .into_response())
}
