use crate::domain::shared::pagination::PageCursor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use ts_rs::TS;
use uuid::Uuid;

/// A guest photo submission.
///
/// # Lifecycle
/// 1. **Pending** - created by the ingestion pipeline
/// 2. **Approved** / **Rejected** - moderation decision
/// 3. **Deleted** - terminal soft delete; the row stays, its objects are purged
///
/// # Invariants
/// - `id` and `created_at` never change after insert
/// - `(created_at, id)` is a total order used as the pagination key
/// - `approved_at`, `rejected_at` and `deleted_at` are written at most once
/// - provenance fields (`ip_hash`, `device_id`, `fingerprint_hash`,
///   `user_agent`) are for abuse triage only and never leave the service
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub id: Uuid,
    pub status: SubmissionStatus,

    /// Normalized caption, at most 140 characters
    pub caption: String,

    /// Object path of the display variant in the photos bucket
    pub image_path: String,

    /// Object path of the thumbnail variant in the thumbs bucket
    pub thumb_path: String,

    pub mime: String,
    pub size_bytes: i64,
    pub width: i32,
    pub height: i32,

    pub ip_hash: String,
    pub device_id: String,
    pub fingerprint_hash: String,
    pub user_agent: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub rejected_by: Option<String>,
    pub deleted_by: Option<String>,
}

impl Submission {
    /// Builds the freshly inserted row for a new submission.
    pub fn pending(new: NewSubmission, now: DateTime<Utc>) -> Self {
        Self {
            id: new.id,
            status: SubmissionStatus::Pending,
            caption: new.caption,
            image_path: new.image_path,
            thumb_path: new.thumb_path,
            mime: new.mime,
            size_bytes: new.size_bytes,
            width: new.width,
            height: new.height,
            ip_hash: new.ip_hash,
            device_id: new.device_id,
            fingerprint_hash: new.fingerprint_hash,
            user_agent: new.user_agent,
            created_at: now,
            updated_at: now,
            approved_at: None,
            rejected_at: None,
            deleted_at: None,
            approved_by: None,
            rejected_by: None,
            deleted_by: None,
        }
    }

    pub fn sort_key(&self) -> PageCursor {
        PageCursor::new(self.created_at, self.id)
    }
}

/// Everything the ingestion pipeline knows before the row exists.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub id: Uuid,
    pub caption: String,
    pub image_path: String,
    pub thumb_path: String,
    pub mime: String,
    pub size_bytes: i64,
    pub width: i32,
    pub height: i32,
    pub ip_hash: String,
    pub device_id: String,
    pub fingerprint_hash: String,
    pub user_agent: String,
}

/// Moderation state of a submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Deleted,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Deleted => "deleted",
        }
    }

    /// Deleted rows are hidden from every listing and accept no transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deleted)
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "deleted" => Ok(Self::Deleted),
            other => Err(format!("unknown submission status '{}'", other)),
        }
    }
}
