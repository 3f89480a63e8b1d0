// ABOUTME: Per-address fixed-window rate limiter shared by every route
// ABOUTME: Tracks request counts per client IP in a sharded map with lazy stale-entry cleanup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::RateLimitConfig;
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Outcome of one rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Whether this request is rejected
    pub is_limited: bool,
    /// Requests allowed per window
    pub limit: u32,
    /// Requests left in the current window after this one
    pub remaining: u32,
    /// Unix timestamp (seconds) when the current window ends
    pub reset_at: i64,
    /// Whole seconds until the window ends, rounded up
    pub retry_after_seconds: u64,
}

/// Fixed-window limiter keyed by client address
///
/// Cloning shares the underlying counters.
#[derive(Clone)]
pub struct IpRateLimiter {
    /// Client IP -> (`request_count`, `window_start`)
    state: Arc<DashMap<IpAddr, (u32, Instant)>>,
    config: RateLimitConfig,
}

impl IpRateLimiter {
    /// Create a limiter with its own empty counter table
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            state: Arc::new(DashMap::new()),
            config,
        }
    }

    /// Configuration in effect
    #[must_use]
    pub const fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count one request from `client_ip` and report whether it is allowed
    #[must_use]
    pub fn check(&self, client_ip: IpAddr) -> RateLimitStatus {
        self.check_at(client_ip, Instant::now())
    }

    fn check_at(&self, client_ip: IpAddr, now: Instant) -> RateLimitStatus {
        let limit = self.config.max_requests;
        let window = self.window();

        let mut entry = self.state.entry(client_ip).or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        if now.duration_since(*window_start) >= window {
            *count = 0;
            *window_start = now;
        }

        let is_limited = *count >= limit;
        if !is_limited {
            *count += 1;
        }
        let remaining = limit.saturating_sub(*count);
        let window_start = *window_start;
        drop(entry);

        if self.state.len() > self.config.cleanup_threshold {
            self.cleanup_expired(now);
        }

        let until_reset = window.saturating_sub(now.duration_since(window_start));
        #[allow(clippy::cast_possible_wrap)]
        // Unix seconds stay far below i64::MAX
        let reset_at = (SystemTime::now() + until_reset)
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs() as i64;
        let retry_after_seconds = until_reset.as_secs() + u64::from(until_reset.subsec_nanos() > 0);

        RateLimitStatus {
            is_limited,
            limit,
            remaining,
            reset_at,
            retry_after_seconds,
        }
    }

    /// Number of addresses currently tracked
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.state.len()
    }

    fn window(&self) -> Duration {
        Duration::from_secs(self.config.window_secs)
    }

    /// Drop counters whose window has ended; they would be reset on next use anyway
    fn cleanup_expired(&self, now: Instant) {
        let window = self.window();
        self.state
            .retain(|_ip, (_count, start)| now.duration_since(*start) < window);
    }
}
