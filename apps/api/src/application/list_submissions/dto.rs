use crate::domain::submission::entity::SubmissionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GalleryItem {
    pub id: Uuid,
    pub caption: String,
    pub created_at: DateTime<Utc>,
    pub thumb_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GalleryPage {
    pub items: Vec<GalleryItem>,
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PhotoDetail {
    pub id: Uuid,
    pub caption: String,
    pub created_at: DateTime<Utc>,
    pub image_url: String,
    pub thumb_url: String,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminSubmissionItem {
    pub id: Uuid,
    pub caption: String,
    pub created_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    pub thumb_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminSubmissionPage {
    pub items: Vec<AdminSubmissionItem>,
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<String>,
}
