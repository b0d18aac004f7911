use crate::domain::shared::errors::DomainError;
use async_trait::async_trait;

/// An authenticated administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub id: String,
}

/// Maps a bearer token to an admin identity. `None` means unauthenticated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Option<AdminIdentity>;
}

/// Membership lookup for the admin allow-list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    async fn is_admin(&self, id: &str) -> Result<bool, DomainError>;
}
