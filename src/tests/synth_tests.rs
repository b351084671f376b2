// Copyright 2022 Nathan (Blaise) Bruer.  All rights reserved.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::pools::{PAYMENT_METHODS, STATUSES};
use crate::synth::{
    synth_amount, synth_location, synth_payment_method, synth_status, synth_timestamp,
};

#[test]
fn amount_stays_in_range_with_two_decimals_test() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..1000 {
        let amount = synth_amount(&mut rng, 1, 250);
        assert!(amount >= "0.01".parse::<BigDecimal>().unwrap());
        assert!(amount <= "2.50".parse::<BigDecimal>().unwrap());
        let text = amount.to_string();
        let decimals = text.split('.').nth(1).map_or(0, |d| d.len());
        assert!(decimals <= 2, "too many decimals in {}", text);
    }
}

#[test]
fn timestamp_without_jitter_is_now_test() {
    let mut rng = StdRng::seed_from_u64(2);
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    assert_eq!(
        synth_timestamp(&mut rng, now, 0),
        "2026-01-01T12:00:00.000000+00:00"
    );
}

#[test]
fn timestamp_with_jitter_stays_in_window_test() {
    let mut rng = StdRng::seed_from_u64(3);
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
    for _ in 0..500 {
        let ts = synth_timestamp(&mut rng, now, 3600);
        let parsed = DateTime::parse_from_rfc3339(&ts).unwrap().with_timezone(&Utc);
        assert!(parsed <= now);
        assert!(parsed >= now - Duration::seconds(3600));
    }
}

#[test]
fn location_is_bounded_test() {
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..1000 {
        let location = synth_location(&mut rng);
        assert!((-90.0..=90.0).contains(&location.lat));
        assert!((-180.0..=180.0).contains(&location.lon));
    }
}

#[test]
fn payment_method_and_status_come_from_pool_test() {
    let mut rng = StdRng::seed_from_u64(5);
    let methods: Vec<String> = PAYMENT_METHODS.iter().map(|v| v.to_string()).collect();
    let statuses: Vec<String> = STATUSES.iter().map(|v| v.to_string()).collect();
    let mut seen_methods = std::collections::HashSet::new();
    for _ in 0..500 {
        let method = synth_payment_method(&mut rng, &methods);
        assert!(PAYMENT_METHODS.contains(&method), "{}", method);
        seen_methods.insert(method);
        let status = synth_status(&mut rng, &statuses);
        assert!(STATUSES.contains(&status), "{}", status);
    }
    assert_eq!(seen_methods.len(), PAYMENT_METHODS.len());
}
