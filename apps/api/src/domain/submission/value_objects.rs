use crate::domain::shared::errors::DomainError;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const CAPTION_MAX_CHARS: usize = 140;

/// Caption after whitespace collapsing, trimming and truncation.
///
/// Always holds: at most 140 characters, no leading or trailing whitespace,
/// no run of two or more whitespace characters. An empty caption is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Caption(String);

impl Caption {
    pub fn normalize(raw: &str) -> Self {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let truncated: String = collapsed.chars().take(CAPTION_MAX_CHARS).collect();
        Self(truncated.trim_end().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Client-generated device identifier, stored as given.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeviceId {
    #[validate(length(min = 1, max = 128))]
    pub value: String,
}

impl DeviceId {
    pub fn new(value: String) -> Result<Self, DomainError> {
        let id = Self { value };
        id.validate()
            .map_err(|_| DomainError::InvalidInput("device_id must be 1-128 characters".into()))?;
        Ok(id)
    }
}

/// Raw browser fingerprint. Only its salted hash is ever persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Fingerprint {
    #[validate(length(min = 1, max = 512))]
    pub value: String,
}

impl Fingerprint {
    pub fn new(value: String) -> Result<Self, DomainError> {
        let fp = Self { value };
        fp.validate()
            .map_err(|_| DomainError::InvalidInput("fingerprint must be 1-512 characters".into()))?;
        Ok(fp)
    }
}
