use crate::{
    application::submit_photo::{SubmitPhotoRequest, SubmitPhotoResponse},
    infrastructure::security::validation::{SubmissionFields, UploadedFile},
    presentation::http::{
        errors::AppError, middleware::client_ip::extract_client_ip, state::AppState,
    },
};
use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::{HeaderMap, StatusCode, header},
};
use tracing::debug;

/// `POST /api/v1/submissions` with multipart fields `photo`, `caption`,
/// `device_id` and `fingerprint`.
pub async fn submit_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<SubmitPhotoResponse>), AppError> {
    let mut multipart = multipart?;
    let mut fields = SubmissionFields::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "photo" => {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                fields.photo = Some(UploadedFile {
                    bytes,
                    content_type,
                });
            }
            "caption" => fields.caption = field.text().await?,
            "device_id" => fields.device_id = field.text().await?,
            "fingerprint" => fields.fingerprint = field.text().await?,
            other => debug!("Ignoring unexpected multipart field {:?}", other),
        }
    }

    let request = SubmitPhotoRequest {
        fields,
        client_ip: extract_client_ip(&headers),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string(),
    };

    let response = state.submit_photo().execute(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
