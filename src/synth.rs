// Copyright 2022 Nathan (Blaise) Bruer.  All rights reserved.

//! Independent per-field value synthesizers. Each one only consumes randomness
//! from the rng it is handed, so callers decide how entropy is shared.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;

use crate::common::{Location, AMOUNT_SCALE};

/// Fractional digits kept on generated coordinates.
const COORDINATE_SCALE: f64 = 10_000.0;

/// Draws an amount uniformly in `[min_cents, max_cents]` cents.
///
/// Callers must ensure `0 < min_cents <= max_cents`.
pub fn synth_amount<R: Rng + ?Sized>(rng: &mut R, min_cents: u64, max_cents: u64) -> BigDecimal {
    let cents = rng.gen_range(min_cents..=max_cents);
    BigDecimal::new(cents.into(), AMOUNT_SCALE)
}

/// Renders `now`, or a uniformly drawn instant up to `jitter_secs` before it, as
/// RFC 3339 with microseconds and an explicit `+00:00` offset.
pub fn synth_timestamp<R: Rng + ?Sized>(
    rng: &mut R,
    now: DateTime<Utc>,
    jitter_secs: u64,
) -> String {
    let instant = if jitter_secs == 0 {
        now
    } else {
        let back_micros = rng.gen_range(0..=jitter_secs * 1_000_000);
        now - Duration::microseconds(back_micros as i64)
    };
    instant.to_rfc3339_opts(SecondsFormat::Micros, false)
}

fn round_coordinate(value: f64) -> f64 {
    (value * COORDINATE_SCALE).round() / COORDINATE_SCALE
}

pub fn synth_location<R: Rng + ?Sized>(rng: &mut R) -> Location {
    Location {
        lat: round_coordinate(rng.gen_range(-90.0..=90.0)),
        lon: round_coordinate(rng.gen_range(-180.0..=180.0)),
    }
}

/// Uniform draw from a non-empty pool.
pub fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, pool: &'a [T]) -> &'a T {
    &pool[rng.gen_range(0..pool.len())]
}

pub fn synth_payment_method<'a, R: Rng + ?Sized>(rng: &mut R, methods: &'a [String]) -> &'a str {
    pick(rng, methods).as_str()
}

pub fn synth_status<'a, R: Rng + ?Sized>(rng: &mut R, statuses: &'a [String]) -> &'a str {
    pick(rng, statuses).as_str()
}
