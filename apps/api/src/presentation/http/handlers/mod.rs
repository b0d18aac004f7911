pub mod admin;
pub mod export;
pub mod gallery;
pub mod health;
pub mod settings;
pub mod submissions;

use super::errors::AppError;
use axum::extract::{Query, rejection::QueryRejection};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

/// `?cursor=` of keyset listings. Malformed values restart from the top.
#[derive(Debug, Default, Deserialize)]
pub struct CursorQuery {
    pub cursor: Option<String>,
}

/// Listings never fail on their query string; an unreadable one means no cursor.
pub(crate) fn cursor_param(query: Result<Query<CursorQuery>, QueryRejection>) -> Option<String> {
    match query {
        Ok(Query(query)) => query.cursor,
        Err(e) => {
            debug!("Ignoring unreadable listing query: {}", e.body_text());
            None
        }
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid submission id".into()))
}
