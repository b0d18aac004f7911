use crate::{domain::shared::errors::DomainError, infrastructure::auth::AdminDirectory};
use async_trait::async_trait;
use sqlx::PgPool;

pub struct SqlxAdminDirectory {
    pool: PgPool,
}

impl SqlxAdminDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminDirectory for SqlxAdminDirectory {
    async fn is_admin(&self, id: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM admin_users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::InfrastructureError(e.to_string()))
    }
}
