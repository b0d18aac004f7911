use super::traits::{AdminDirectory, AdminIdentity, IdentityResolver};
use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub exp: usize,
}

/// HS256 bearer tokens whose subject must be on the admin allow-list.
pub struct JwtAdminResolver {
    key: DecodingKey,
    directory: Arc<dyn AdminDirectory>,
}

impl JwtAdminResolver {
    pub fn new(secret: &str, directory: Arc<dyn AdminDirectory>) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            directory,
        }
    }
}

#[async_trait]
impl IdentityResolver for JwtAdminResolver {
    async fn resolve(&self, token: &str) -> Option<AdminIdentity> {
        let claims = match decode::<AdminClaims>(token, &self.key, &Validation::default()) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!("Rejected admin token: {}", e);
                return None;
            }
        };

        match self.directory.is_admin(&claims.sub).await {
            Ok(true) => Some(AdminIdentity { id: claims.sub }),
            Ok(false) => {
                warn!(sub = %claims.sub, "Valid token for a non-admin subject");
                None
            }
            Err(e) => {
                warn!("Admin lookup failed: {}", e);
                None
            }
        }
    }
}
