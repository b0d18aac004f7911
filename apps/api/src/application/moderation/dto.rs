use crate::domain::submission::entity::SubmissionStatus;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Result of a moderation transition. `changed` is false when the guard
/// did not hold and the row was left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModerationOutcome {
    pub id: Uuid,
    pub status: SubmissionStatus,
    pub changed: bool,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct EditCaptionRequest {
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CaptionUpdated {
    pub id: Uuid,
    pub caption: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateSettingsRequest {
    pub approvals_enabled: bool,
}
