//! Rate limiting middleware
//!
//! Keyed token-bucket limits backed by `governor`. The HTTP API keys buckets
//! by client IP; the bot keys them by Telegram user id. Governor keeps one
//! bucket per key it has seen, so `spawn_pruning` must run alongside each
//! long-lived limiter to drop idle keys.

use std::hash::Hash;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use crate::utils::errors::{DramamuError, Result};

/// Per-key request limiter
pub struct RateLimitMiddleware<K>
where
    K: Hash + Eq + Clone,
{
    limiter: RateLimiter<K, DefaultKeyedStateStore<K>, DefaultClock>,
    per_minute: u32,
}

impl<K> RateLimitMiddleware<K>
where
    K: Hash + Eq + Clone + std::fmt::Display,
{
    /// Allow `per_minute` requests per key, all of which may arrive in one burst
    pub fn per_minute(per_minute: u32) -> Result<Self> {
        let limit = NonZeroU32::new(per_minute)
            .ok_or_else(|| DramamuError::Config("Rate limit must be greater than 0".to_string()))?;
        Ok(Self::with_quota(Quota::per_minute(limit), per_minute))
    }

    fn with_quota(quota: Quota, per_minute: u32) -> Self {
        Self {
            limiter: RateLimiter::keyed(quota),
            per_minute,
        }
    }

    /// Take one request from the key's bucket
    pub fn check(&self, key: &K) -> Result<()> {
        match self.limiter.check_key(key) {
            Ok(()) => Ok(()),
            Err(_) => {
                warn!(key = %key, per_minute = self.per_minute, "Rate limit exceeded");
                Err(DramamuError::RateLimitExceeded)
            }
        }
    }

    /// Drop buckets that have refilled completely
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }

    /// Number of keys currently tracked
    pub fn len(&self) -> usize {
        self.limiter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiter.is_empty()
    }
}

impl<K> RateLimitMiddleware<K>
where
    K: Hash + Eq + Clone + std::fmt::Display + Send + Sync + 'static,
{
    /// Prune refilled buckets every `every` until the runtime shuts down
    pub fn spawn_pruning(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let before = self.len();
                self.retain_recent();
                debug!(before = before, after = self.len(), "Pruned rate limit buckets");
            }
        })
    }
}

/// axum middleware limiting requests per client IP.
///
/// The IP comes from the connection info; requests served without it (tests
/// driving the router directly) share one bucket.
pub async fn limit_by_ip(
    State(limiter): State<Arc<RateLimitMiddleware<IpAddr>>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if let Err(e) = limiter.check(&ip) {
        return crate::api::ApiError::from(e).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_per_key() {
        let limiter = RateLimitMiddleware::<i64>::per_minute(2).unwrap();

        assert!(limiter.check(&1).is_ok());
        assert!(limiter.check(&1).is_ok());
        assert!(matches!(limiter.check(&1), Err(DramamuError::RateLimitExceeded)));
        assert!(limiter.check(&2).is_ok());
    }

    #[test]
    fn test_refilled_keys_are_dropped() {
        let quota = Quota::with_period(Duration::from_millis(10)).unwrap();
        let limiter = RateLimitMiddleware::<i64>::with_quota(quota, 6000);

        limiter.check(&1).unwrap();
        limiter.check(&2).unwrap();
        assert_eq!(limiter.len(), 2);

        std::thread::sleep(Duration::from_millis(50));
        limiter.retain_recent();
        assert!(limiter.is_empty());
    }

    #[test]
    fn test_busy_keys_are_kept() {
        let limiter = RateLimitMiddleware::<i64>::per_minute(2).unwrap();
        limiter.check(&1).unwrap();

        limiter.retain_recent();
        assert_eq!(limiter.len(), 1);
    }

    #[tokio::test]
    async fn test_pruning_task_drops_idle_keys() {
        let quota = Quota::with_period(Duration::from_millis(10)).unwrap();
        let limiter = Arc::new(RateLimitMiddleware::<i64>::with_quota(quota, 6000));
        limiter.check(&1).unwrap();

        let task = limiter.clone().spawn_pruning(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;
        task.abort();

        assert!(limiter.is_empty());
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        assert!(RateLimitMiddleware::<i64>::per_minute(0).is_err());
    }
}
