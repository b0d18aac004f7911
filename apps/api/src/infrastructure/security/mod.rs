pub mod hashing;
pub mod rate_limiter;
pub mod validation;

pub use rate_limiter::{Limiter, RateLimitPolicy, RateLimiterGate, RedisSlidingWindowLimiter};
pub use validation::{SubmissionFields, SubmissionValidator, UploadedFile, ValidationConfig};
