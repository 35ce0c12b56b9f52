use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use lyceum_core::{Clock, DurableStore, FixedClock, RATE_WINDOW_KEY};
use lyceum_limiter::{RateLimiter, UsageLevel};
use lyceum_store::InMemoryStore;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap()
}

fn new_limiter(limit: u32) -> (Arc<InMemoryStore>, FixedClock, RateLimiter) {
    let store = Arc::new(InMemoryStore::new());
    let clock = FixedClock::at(t0());
    let limiter = RateLimiter::with_clock(store.clone(), Arc::new(clock.clone())).with_limit(limit);
    (store, clock, limiter)
}

#[test]
fn allows_up_to_the_limit_then_rejects() {
    let (_, _, limiter) = new_limiter(50);

    for i in 1..=50 {
        assert!(limiter.try_record(), "call {i} should be allowed");
    }
    assert!(!limiter.try_record(), "call 51 should be rejected");

    let status = limiter.status();
    assert!(status.is_limited);
    assert_eq!(status.request_count, 50);
    assert_eq!(status.level, UsageLevel::Limited);
}

#[test]
fn rejected_record_does_not_mutate() {
    let (_, _, limiter) = new_limiter(2);
    assert!(limiter.try_record());
    assert!(limiter.try_record());

    assert!(!limiter.try_record());
    assert!(!limiter.try_record());
    // The stored count never moves past the limit.
    assert_eq!(limiter.status().request_count, 2);
}

#[test]
fn status_never_consumes_budget() {
    let (_, _, limiter) = new_limiter(5);
    assert!(limiter.try_record());

    for _ in 0..10 {
        assert_eq!(limiter.status().request_count, 1);
    }
}

#[test]
fn window_rolls_over_after_expiry() {
    let (_, clock, limiter) = new_limiter(50);

    for _ in 0..7 {
        assert!(limiter.try_record());
    }
    assert_eq!(limiter.status().request_count, 7);

    // One second past the window end.
    clock.advance(Duration::minutes(60) + Duration::seconds(1));

    let status = limiter.status();
    assert_eq!(status.request_count, 0);
    assert_eq!(status.window_start, clock.now());
    assert!(!status.is_limited);
}

#[test]
fn limit_resets_in_the_next_window() {
    let (_, clock, limiter) = new_limiter(3);

    for _ in 0..3 {
        assert!(limiter.try_record());
    }
    assert!(!limiter.try_record());

    clock.advance(Duration::minutes(61));

    assert!(limiter.try_record());
    assert_eq!(limiter.status().request_count, 1);
}

#[test]
fn window_end_is_derived_from_start() {
    let (_, _, limiter) = new_limiter(5);
    let status = limiter.status();
    assert_eq!(status.window_end - status.window_start, Duration::minutes(60));
}

#[test]
fn corrupt_window_fails_open() {
    let (store, _, limiter) = new_limiter(5);
    store.write(RATE_WINDOW_KEY, "{{ not json").unwrap();

    let status = limiter.status();
    assert_eq!(status.request_count, 0);
    assert!(!status.is_limited);
    assert!(limiter.try_record());
}

#[test]
fn usage_percent_and_levels_track_the_count() {
    let (_, _, limiter) = new_limiter(10);

    assert_eq!(limiter.status().level, UsageLevel::Safe);

    for _ in 0..7 {
        assert!(limiter.try_record());
    }
    let status = limiter.status();
    assert_eq!(status.usage_percent, 70);
    assert_eq!(status.level, UsageLevel::Warning);

    assert!(limiter.try_record());
    assert!(limiter.try_record());
    let status = limiter.status();
    assert_eq!(status.usage_percent, 90);
    assert_eq!(status.level, UsageLevel::Danger);

    assert!(limiter.try_record());
    let status = limiter.status();
    assert_eq!(status.usage_percent, 100);
    assert_eq!(status.level, UsageLevel::Limited);
    assert!(status.is_limited);
}

#[test]
fn custom_window_length_is_respected() {
    let store = Arc::new(InMemoryStore::new());
    let clock = FixedClock::at(t0());
    let limiter = RateLimiter::with_clock(store, Arc::new(clock.clone()))
        .with_limit(2)
        .with_window(Duration::minutes(5));

    assert!(limiter.try_record());
    assert!(limiter.try_record());
    assert!(!limiter.try_record());

    clock.advance(Duration::minutes(6));
    assert!(limiter.try_record());
}
