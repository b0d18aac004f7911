use crate::domain::{
    settings::{
        entity::{AppSettings, APPROVALS_ENABLED_KEY},
        repository::SettingsRepository,
    },
    shared::errors::DomainError,
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};

/// Settings singleton stored as JSON rows in `app_settings`.
pub struct SqlxSettingsRepository {
    pool: PgPool,
}

impl SqlxSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqlxSettingsRepository {
    async fn get(&self) -> Result<AppSettings, DomainError> {
        let value: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT value FROM app_settings WHERE key = $1")
                .bind(APPROVALS_ENABLED_KEY)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    error!("Failed to read settings: {}", e);
                    DomainError::InfrastructureError(e.to_string())
                })?;
        Ok(AppSettings::from_stored(value.as_ref()))
    }

    async fn save(&self, settings: AppSettings) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO app_settings (key, value, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
        )
        .bind(APPROVALS_ENABLED_KEY)
        .bind(settings.to_stored())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to save settings: {}", e);
            DomainError::InfrastructureError(e.to_string())
        })?;
        info!(approvals_enabled = settings.approvals_enabled, "Settings updated");
        Ok(())
    }
}
