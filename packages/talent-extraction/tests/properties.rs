//! Property tests for the classifier and the limiter.

use proptest::prelude::*;
use std::sync::Arc;

use talent_extraction::{
    classifier::host_of, classify, is_valid_profile_locator, testing::ManualClock,
    ExtractionError, Platform, RateLimiter,
};

proptest! {
    #[test]
    fn classify_is_total(locator in ".*") {
        let platform = classify(&locator);
        // Anything that fails validation is Unknown
        if !is_valid_profile_locator(&locator) {
            prop_assert_eq!(platform, Platform::Unknown);
        }
    }

    #[test]
    fn linkedin_subdomains_classify_as_linkedin(
        sub in "[a-z]{1,8}",
        path in "[a-z0-9/]{0,20}",
    ) {
        let locator = format!("https://{sub}.linkedin.com/{path}");
        prop_assert_eq!(classify(&locator), Platform::Linkedin);
        prop_assert_eq!(host_of(&locator), Some(format!("{sub}.linkedin.com")));
    }

    #[test]
    fn non_http_schemes_are_unknown(scheme in "(ftp|file|mailto|javascript|data)") {
        let locator = format!("{scheme}://linkedin.com/in/someone");
        prop_assert_eq!(classify(&locator), Platform::Unknown);
    }

    #[test]
    fn admissions_never_exceed_limit(
        limit in 1u32..20,
        attempts in 0usize..60,
        start in 0i64..10_000_000,
    ) {
        let limiter = RateLimiter::with_clock(limit, Arc::new(ManualClock::at_millis(start)));

        let mut admitted = 0;
        for _ in 0..attempts {
            match limiter.admit("profile") {
                Ok(()) => admitted += 1,
                Err(ExtractionError::RateLimitExceeded { retry_after_seconds, .. }) => {
                    prop_assert!((1..=60).contains(&retry_after_seconds));
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }

        prop_assert_eq!(admitted, attempts.min(limit as usize));
        prop_assert_eq!(limiter.remaining("profile"), limit - admitted as u32);
    }

    #[test]
    fn window_roll_restores_allowance(limit in 1u32..10, start in 0i64..1_000_000) {
        let clock = Arc::new(ManualClock::at_millis(start));
        let limiter = RateLimiter::with_clock(limit, clock.clone());

        for _ in 0..limit {
            prop_assert!(limiter.admit("image").is_ok());
        }
        prop_assert!(limiter.admit("image").is_err());

        clock.advance_millis(60_000);
        prop_assert!(limiter.admit("image").is_ok());
        prop_assert!(limiter.tracked_buckets() <= 2);
    }
}
