use super::*;

const WINDOW: Duration = Duration::from_secs(60);

#[test]
fn allows_until_limit_reached() {
    let throttle = LoginThrottle::new(3, WINDOW);
    let now = Instant::now();

    for i in 0..3 {
        assert!(throttle.check_at("a@b.com", now).is_ok(), "attempt {i} should be allowed");
        throttle.record_failure_at("a@b.com", now);
    }
    assert!(matches!(throttle.check_at("a@b.com", now), Err(ThrottleError::TooManyAttempts { .. })));
}

#[test]
fn keys_are_independent() {
    let throttle = LoginThrottle::new(1, WINDOW);
    let now = Instant::now();

    throttle.record_failure_at("a@b.com", now);
    assert!(throttle.check_at("a@b.com", now).is_err());
    assert!(throttle.check_at("c@d.com", now).is_ok());
}

#[test]
fn window_expiry_restores_budget() {
    let throttle = LoginThrottle::new(2, WINDOW);
    let start = Instant::now();

    throttle.record_failure_at("a@b.com", start);
    throttle.record_failure_at("a@b.com", start);
    assert!(throttle.check_at("a@b.com", start + Duration::from_secs(59)).is_err());
    assert!(throttle.check_at("a@b.com", start + WINDOW).is_ok());
}

#[test]
fn retry_after_counts_down_from_oldest_failure() {
    let throttle = LoginThrottle::new(1, WINDOW);
    let start = Instant::now();

    throttle.record_failure_at("a@b.com", start);
    assert_eq!(
        throttle.check_at("a@b.com", start + Duration::from_secs(20)),
        Err(ThrottleError::TooManyAttempts { retry_after_secs: 40 })
    );
}

#[test]
fn retry_after_is_at_least_one_second() {
    let throttle = LoginThrottle::new(1, WINDOW);
    let start = Instant::now();

    throttle.record_failure_at("a@b.com", start);
    assert_eq!(
        throttle.check_at("a@b.com", start + Duration::from_millis(59_900)),
        Err(ThrottleError::TooManyAttempts { retry_after_secs: 1 })
    );
}

#[test]
fn reset_clears_failures() {
    let throttle = LoginThrottle::new(1, WINDOW);
    throttle.record_failure("a@b.com");
    assert!(throttle.check("a@b.com").is_err());

    throttle.reset("a@b.com");
    assert!(throttle.check("a@b.com").is_ok());
}

#[test]
fn clones_share_state() {
    let throttle = LoginThrottle::new(1, WINDOW);
    let other = throttle.clone();
    other.record_failure("a@b.com");
    assert!(throttle.check("a@b.com").is_err());
}

#[test]
fn checking_after_window_drops_the_key() {
    let throttle = LoginThrottle::new(3, WINDOW);
    let start = Instant::now();

    throttle.record_failure_at("a@b.com", start);
    assert_eq!(throttle.tracked_keys(), 1);

    assert!(throttle.check_at("a@b.com", start + WINDOW).is_ok());
    assert_eq!(throttle.tracked_keys(), 0);
}

#[test]
fn sprayed_keys_do_not_accumulate() {
    let throttle = LoginThrottle::new(5, WINDOW);
    let start = Instant::now();

    for i in 0..1_000 {
        throttle.record_failure_at(&format!("spray{i}@x.io"), start);
    }
    assert_eq!(throttle.tracked_keys(), 1_000);

    // One later failure sweeps every key whose window has passed.
    let later = start + Duration::from_secs(3600);
    throttle.record_failure_at("fresh@x.io", later);
    assert_eq!(throttle.tracked_keys(), 1);

    assert!(throttle.check_at("fresh@x.io", later + WINDOW).is_ok());
    assert_eq!(throttle.tracked_keys(), 0);
}
