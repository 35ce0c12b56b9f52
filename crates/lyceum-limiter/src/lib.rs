use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use lyceum_core::{
    Clock, DurableStore, SystemClock, HOURLY_REQUEST_LIMIT, RATE_WINDOW_KEY, WINDOW_MINUTES,
};

/// One fixed accounting window for the request counter.
///
/// The window's end is derived (`window_start + window length`) and never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestWindow {
    pub window_start: DateTime<Utc>,
    pub request_count: u32,
}

/// Severity classification of window usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageLevel {
    Safe,
    Warning,
    Danger,
    Limited,
}

impl UsageLevel {
    /// Classify a usage percentage. Non-decreasing in `percent`.
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            0..=69 => UsageLevel::Safe,
            70..=89 => UsageLevel::Warning,
            90..=99 => UsageLevel::Danger,
            _ => UsageLevel::Limited,
        }
    }
}

/// Read-only snapshot of the current window.
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    pub request_count: u32,
    pub limit: u32,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub is_limited: bool,
    pub usage_percent: u32,
    pub level: UsageLevel,
}

/// Fixed-window request counter over the shared durable store.
///
/// There is no timer: the window advances only when observed. A status or
/// record call that finds the stored window expired starts a fresh one at
/// the current instant. Storage faults never block the caller: an
/// unreadable or corrupt window is treated as a fresh, empty one, and a
/// failed persist is logged and ignored. The one hard stop is the limit
/// itself, where a record attempt is rejected without mutation.
pub struct RateLimiter {
    store: Arc<dyn DurableStore>,
    clock: Arc<dyn Clock>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn DurableStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            limit: HOURLY_REQUEST_LIMIT,
            window: Duration::minutes(WINDOW_MINUTES),
        }
    }

    /// Override the per-window request limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Override the window length.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Snapshot the current window. Never mutates the request count; an
    /// expired window is lazily replaced by a fresh one starting now.
    pub fn status(&self) -> RateLimitStatus {
        let window = self.current_window();
        let usage_percent = self.usage_percent(window.request_count);
        RateLimitStatus {
            request_count: window.request_count,
            limit: self.limit,
            window_start: window.window_start,
            window_end: window.window_start + self.window,
            is_limited: window.request_count >= self.limit,
            usage_percent,
            level: UsageLevel::from_percent(usage_percent),
        }
    }

    /// Record one request against the current window.
    ///
    /// Returns `false` without mutating anything when the window is at its
    /// limit. A failed persist still returns `true`: the limiter is
    /// advisory, and the business action must not hinge on its storage.
    pub fn try_record(&self) -> bool {
        let mut window = self.current_window();
        if window.request_count >= self.limit {
            return false;
        }
        window.request_count += 1;
        self.persist(&window);
        true
    }

    /// Load the stored window, rolling over lazily if it has expired.
    fn current_window(&self) -> RequestWindow {
        let now = self.clock.now();
        let stored = match self.store.read(RATE_WINDOW_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<RequestWindow>(&raw) {
                Ok(window) => Some(window),
                Err(e) => {
                    tracing::warn!("discarding corrupt rate-limit window: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("failed to read rate-limit window: {e}");
                None
            }
        };

        match stored {
            Some(window) if now < window.window_start + self.window => window,
            expired => {
                let fresh = RequestWindow {
                    window_start: now,
                    request_count: 0,
                };
                if expired.is_some() {
                    self.persist(&fresh);
                }
                fresh
            }
        }
    }

    fn persist(&self, window: &RequestWindow) {
        match serde_json::to_string(window) {
            Ok(raw) => {
                if let Err(e) = self.store.write(RATE_WINDOW_KEY, &raw) {
                    tracing::warn!("failed to persist rate-limit window: {e}");
                }
            }
            Err(e) => tracing::warn!("failed to serialize rate-limit window: {e}"),
        }
    }

    fn usage_percent(&self, request_count: u32) -> u32 {
        if self.limit == 0 {
            return 100;
        }
        let percent = (request_count as f64 / self.limit as f64 * 100.0).round() as u32;
        percent.min(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_thresholds() {
        assert_eq!(UsageLevel::from_percent(0), UsageLevel::Safe);
        assert_eq!(UsageLevel::from_percent(69), UsageLevel::Safe);
        assert_eq!(UsageLevel::from_percent(70), UsageLevel::Warning);
        assert_eq!(UsageLevel::from_percent(89), UsageLevel::Warning);
        assert_eq!(UsageLevel::from_percent(90), UsageLevel::Danger);
        assert_eq!(UsageLevel::from_percent(99), UsageLevel::Danger);
        assert_eq!(UsageLevel::from_percent(100), UsageLevel::Limited);
        assert_eq!(UsageLevel::from_percent(250), UsageLevel::Limited);
    }

    #[test]
    fn level_is_monotonic_in_percent() {
        fn rank(level: UsageLevel) -> u8 {
            match level {
                UsageLevel::Safe => 0,
                UsageLevel::Warning => 1,
                UsageLevel::Danger => 2,
                UsageLevel::Limited => 3,
            }
        }

        let mut previous = 0;
        for percent in 0..=120 {
            let current = rank(UsageLevel::from_percent(percent));
            assert!(current >= previous, "level dropped at {percent}%");
            previous = current;
        }
    }
}
