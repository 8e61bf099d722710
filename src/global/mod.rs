pub mod middleware;
pub mod rate_limit;

pub use middleware::{request_id_middleware, RequestId};
pub use rate_limit::{RateLimitDecision, RateLimiter};
