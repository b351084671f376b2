// Copyright 2022 Nathan (Blaise) Bruer.  All rights reserved.

use std::cell::RefCell;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::{Transaction, AMOUNT_SCALE, MAX_AMOUNT_CENTS};
use crate::pools::ReferencePools;
use crate::synth::{
    pick, synth_amount, synth_location, synth_payment_method, synth_status, synth_timestamp,
};
use crate::txn_id::idempotent_id_with;
use crate::{make_config_err, Error};

pub const DEFAULT_MIN_AMOUNT_CENTS: u64 = 100;
pub const DEFAULT_MAX_AMOUNT_CENTS: u64 = 500_000;

/// Ten years; keeps the jitter window far away from chrono's representable range.
pub const MAX_TIMESTAMP_JITTER_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Tunables for field synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Smallest amount drawn, inclusive. Must be at least 0.01.
    pub min_amount: BigDecimal,
    /// Largest amount drawn, inclusive.
    pub max_amount: BigDecimal,
    /// When non-zero, timestamps are spread uniformly over this many seconds before now.
    pub timestamp_jitter_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_amount: cents_to_amount(DEFAULT_MIN_AMOUNT_CENTS),
            max_amount: cents_to_amount(DEFAULT_MAX_AMOUNT_CENTS),
            timestamp_jitter_secs: 0,
        }
    }
}

fn cents_to_amount(cents: u64) -> BigDecimal {
    BigDecimal::new(cents.into(), AMOUNT_SCALE)
}

fn amount_to_cents(name: &str, amount: &BigDecimal) -> Result<u64, Error> {
    if amount.with_scale(AMOUNT_SCALE) != *amount {
        return Err(make_config_err!(
            "{} ({}) has more than {} decimal places",
            name,
            amount,
            AMOUNT_SCALE
        ));
    }
    (amount.clone() * BigDecimal::from(100))
        .with_scale(0)
        .to_string()
        .parse::<u64>()
        .map_err(|_| make_config_err!("{} ({}) must be a non-negative amount", name, amount))
}

impl GeneratorConfig {
    /// Validates the config and returns the inclusive amount range in cents.
    fn amount_bounds_cents(&self) -> Result<(u64, u64), Error> {
        let min_cents = amount_to_cents("min_amount", &self.min_amount)?;
        let max_cents = amount_to_cents("max_amount", &self.max_amount)?;
        if min_cents == 0 {
            return Err(make_config_err!(
                "min_amount must be at least 0.01, got {}",
                self.min_amount
            ));
        }
        if max_cents > MAX_AMOUNT_CENTS {
            return Err(make_config_err!(
                "max_amount must be at most {}, got {}",
                cents_to_amount(MAX_AMOUNT_CENTS),
                self.max_amount
            ));
        }
        if min_cents > max_cents {
            return Err(make_config_err!(
                "min_amount ({}) must not exceed max_amount ({})",
                self.min_amount,
                self.max_amount
            ));
        }
        if self.timestamp_jitter_secs > MAX_TIMESTAMP_JITTER_SECS {
            return Err(make_config_err!(
                "timestamp_jitter_secs must be at most {}, got {}",
                MAX_TIMESTAMP_JITTER_SECS,
                self.timestamp_jitter_secs
            ));
        }
        Ok((min_cents, max_cents))
    }
}

/// Assembles complete transactions out of the reference pools and field synthesizers.
///
/// Every generator owns its entropy source, so one generator per thread (or per
/// worker) is all that is needed for concurrent use. The pools are shared.
pub struct TransactionGenerator<R = StdRng> {
    pools: Arc<ReferencePools>,
    config: GeneratorConfig,
    min_cents: u64,
    max_cents: u64,
    clock: fn() -> DateTime<Utc>,
    rng: R,
}

impl<R: Rng> TransactionGenerator<R> {
    pub fn new(pools: Arc<ReferencePools>, config: GeneratorConfig, rng: R) -> Result<Self, Error> {
        let (min_cents, max_cents) = config.amount_bounds_cents()?;
        Ok(Self {
            pools,
            config,
            min_cents,
            max_cents,
            clock: Utc::now,
            rng,
        })
    }

    /// Replaces the source of "now" used for timestamps.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn pools(&self) -> &Arc<ReferencePools> {
        &self.pools
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Produces one schema-valid transaction. Never performs I/O.
    pub fn generate_transaction(&mut self) -> Transaction {
        let rng = &mut self.rng;
        let pools = &*self.pools;

        let user_id = pick(rng, pools.users()).clone();
        let merchant = pick(rng, pools.merchants());
        let currency = pick(rng, pools.currencies()).clone();
        let payment_method = synth_payment_method(rng, pools.payment_methods()).to_string();
        let status = synth_status(rng, pools.statuses()).to_string();

        let amount = synth_amount(rng, self.min_cents, self.max_cents);
        let timestamp = synth_timestamp(rng, (self.clock)(), self.config.timestamp_jitter_secs);
        let location = synth_location(rng);

        let txn_id = idempotent_id_with(rng, &user_id, &timestamp, &amount);

        Transaction {
            txn_id,
            user_id,
            amount,
            currency,
            timestamp,
            merchant_id: merchant.id.clone(),
            merchant_category: merchant.category.clone(),
            payment_method,
            status,
            location,
        }
    }
}

impl TransactionGenerator<StdRng> {
    /// Generator whose rng is seeded from the operating system.
    pub fn from_entropy(pools: Arc<ReferencePools>, config: GeneratorConfig) -> Result<Self, Error> {
        Self::new(pools, config, StdRng::from_entropy())
    }

    /// Generator whose rng is seeded from `seed`; with a fixed clock the output is
    /// fully reproducible.
    pub fn seeded(
        pools: Arc<ReferencePools>,
        config: GeneratorConfig,
        seed: u64,
    ) -> Result<Self, Error> {
        Self::new(pools, config, StdRng::seed_from_u64(seed))
    }
}

thread_local! {
    static LOCAL_GENERATOR: RefCell<TransactionGenerator<StdRng>> = RefCell::new(
        // The default config is within bounds, so this can only fail if the defaults
        // above are edited badly.
        TransactionGenerator::from_entropy(ReferencePools::standard(), GeneratorConfig::default())
            .unwrap_or_else(|e| panic!("Default transaction generator is invalid : {}", e))
    );
}

/// Generates one transaction from the standard pools using a generator private to
/// the calling thread.
pub fn generate_transaction() -> Transaction {
    LOCAL_GENERATOR.with(|generator| generator.borrow_mut().generate_transaction())
}
