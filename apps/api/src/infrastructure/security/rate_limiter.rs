use async_trait::async_trait;
use chrono::Utc;
use redis::{Client, Script};
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};
use uuid::Uuid;

/// Trims the window, then records the event only if it is admitted.
const SLIDING_WINDOW_SCRIPT: &str = r"
local key = KEYS[1]
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local limit = tonumber(ARGV[3])
redis.call('ZREMRANGEBYSCORE', key, 0, now - window)
local count = redis.call('ZCARD', key)
if count < limit then
  redis.call('ZADD', key, now, ARGV[4])
  redis.call('PEXPIRE', key, window)
  return 1
end
return 0
";

/// Sliding-window admission backend keyed by an identity string.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Limiter: Send + Sync {
    async fn admit(&self, key: &str, limit: u32, window: Duration) -> anyhow::Result<bool>;
}

/// Redis sorted-set log: one member per admitted event, scored by epoch millis.
pub struct RedisSlidingWindowLimiter {
    client: Client,
    script: Script,
}

impl RedisSlidingWindowLimiter {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            script: Script::new(SLIDING_WINDOW_SCRIPT),
        }
    }
}

#[async_trait]
impl Limiter for RedisSlidingWindowLimiter {
    async fn admit(&self, key: &str, limit: u32, window: Duration) -> anyhow::Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let now_ms = Utc::now().timestamp_millis();
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        let admitted: i64 = self
            .script
            .key(format!("rl:{}", key))
            .arg(now_ms)
            .arg(window_ms)
            .arg(limit)
            .arg(Uuid::now_v7().to_string())
            .invoke_async(&mut conn)
            .await?;
        Ok(admitted == 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub limit: u32,
    pub window: Duration,
}

/// Admission control for submissions and admin actions.
///
/// Built once at startup. With no backend configured, or when the backend
/// errors, every request is admitted: limiter availability is not a
/// correctness requirement.
pub struct RateLimiterGate {
    backend: Option<Arc<dyn Limiter>>,
    submit: RateLimitPolicy,
    admin: RateLimitPolicy,
}

impl RateLimiterGate {
    pub fn new(
        backend: Option<Arc<dyn Limiter>>,
        submit: RateLimitPolicy,
        admin: RateLimitPolicy,
    ) -> Self {
        if backend.is_none() {
            warn!("No rate limiter backend configured; all requests will be admitted");
        }
        Self {
            backend,
            submit,
            admin,
        }
    }

    pub async fn admit_submission(&self, ip_hash: &str) -> bool {
        self.admit(&format!("submit:ip:{}", ip_hash), self.submit).await
    }

    pub async fn admit_admin(&self, admin_id: &str, client_ip: &str) -> bool {
        self.admit(&format!("admin:{}:{}", admin_id, client_ip), self.admin)
            .await
    }

    async fn admit(&self, key: &str, policy: RateLimitPolicy) -> bool {
        let Some(backend) = &self.backend else {
            return true;
        };
        match backend.admit(key, policy.limit, policy.window).await {
            Ok(allowed) => {
                if !allowed {
                    debug!(key, "Rate limit reached");
                }
                allowed
            }
            Err(e) => {
                warn!(key, "Rate limiter unavailable, admitting request: {}", e);
                true
            }
        }
    }
}
