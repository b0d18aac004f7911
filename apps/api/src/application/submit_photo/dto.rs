use crate::infrastructure::security::validation::SubmissionFields;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SubmitPhotoRequest {
    pub fields: SubmissionFields,
    pub client_ip: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitPhotoResponse {
    pub id: Uuid,
}
