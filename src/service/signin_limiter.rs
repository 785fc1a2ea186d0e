use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use tracing::warn;

/// Per-email sign-in throttle.
pub struct SigninLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl SigninLimiter {
    /// A quota of 0 is clamped to 1 attempt per minute.
    pub fn per_minute(attempts: u32) -> Self {
        let burst = NonZeroU32::new(attempts).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(burst)),
        }
    }

    /// Consume one attempt for `email`. Returns false once the quota is spent.
    pub fn check(&self, email: &str) -> bool {
        let allowed = self.limiter.check_key(&email.to_string()).is_ok();
        if !allowed {
            warn!(email, "sign-in rate limit exceeded");
        }
        // drop idle keys so the map does not grow with every address ever tried
        if self.limiter.len() > 10_000 {
            self.limiter.retain_recent();
        }
        allowed
    }
}
