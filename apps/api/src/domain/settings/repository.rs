use super::entity::AppSettings;
use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> Result<AppSettings, DomainError>;
    async fn save(&self, settings: AppSettings) -> Result<(), DomainError>;
}
