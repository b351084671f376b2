// Copyright 2022 Nathan (Blaise) Bruer.  All rights reserved.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::common::Merchant;
use crate::{make_config_err, Error};

pub const DEFAULT_USER_COUNT: usize = 1000;
pub const DEFAULT_MERCHANT_COUNT: usize = 200;

/// Largest pool sizes that still fit the fixed-width id formats below.
pub const MAX_USER_COUNT: usize = 999_999;
pub const MAX_MERCHANT_COUNT: usize = 9_999;

pub const USER_PREFIX: &str = "user_";
pub const MERCHANT_PREFIX: &str = "merchant_";

/// Merchant `i` (1-based) trades in `MERCHANT_CATEGORIES[(i - 1) % len]`.
pub const MERCHANT_CATEGORIES: [&str; 10] = [
    "grocery",
    "electronics",
    "restaurant",
    "travel",
    "entertainment",
    "gas_station",
    "healthcare",
    "clothing",
    "utilities",
    "online_retail",
];

pub const CURRENCIES: [&str; 8] = ["USD", "EUR", "GBP", "JPY", "CAD", "AUD", "CHF", "INR"];

pub const PAYMENT_METHODS: [&str; 5] = [
    "credit_card",
    "debit_card",
    "bank_transfer",
    "digital_wallet",
    "crypto",
];

pub const STATUSES: [&str; 4] = ["completed", "pending", "failed", "refunded"];

pub fn user_id(n: usize) -> String {
    format!("{}{:06}", USER_PREFIX, n)
}

pub fn merchant_id(n: usize) -> String {
    format!("{}{:04}", MERCHANT_PREFIX, n)
}

fn is_valid_user_id(id: &str) -> bool {
    match id.strip_prefix(USER_PREFIX) {
        Some(digits) => digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

fn is_valid_merchant_id(id: &str) -> bool {
    matches!(id.strip_prefix(MERCHANT_PREFIX), Some(rest) if !rest.is_empty())
}

fn check_not_empty<T>(name: &str, pool: &[T]) -> Result<(), Error> {
    if pool.is_empty() {
        return Err(make_config_err!("Reference pool '{}' must not be empty", name));
    }
    Ok(())
}

fn check_labels(name: &str, pool: &[String]) -> Result<(), Error> {
    check_not_empty(name, pool)?;
    if let Some(label) = pool.iter().find(|v| v.trim().is_empty()) {
        return Err(make_config_err!(
            "Reference pool '{}' contains a blank entry : {:?}",
            name,
            label
        ));
    }
    Ok(())
}

/// The closed sets every categorical field of a transaction is drawn from.
///
/// Pools are validated once in the constructor and there is no way to mutate them
/// afterwards, so a generator holding an `Arc<ReferencePools>` can draw from them
/// from any number of threads without locking.
#[derive(Debug)]
pub struct ReferencePools {
    users: Vec<String>,
    user_index: HashSet<String>,
    merchants: Vec<Merchant>,
    merchant_index: HashMap<String, usize>,
    currencies: Vec<String>,
    payment_methods: Vec<String>,
    statuses: Vec<String>,
}

impl ReferencePools {
    /// Builds pools from caller supplied sets.
    ///
    /// Fails with `ErrorKind::Configuration` if any pool is empty, a user id is not
    /// `user_` plus six digits, a merchant id lacks the `merchant_` prefix, or an id
    /// appears twice.
    pub fn new(
        users: Vec<String>,
        merchants: Vec<Merchant>,
        currencies: Vec<String>,
        payment_methods: Vec<String>,
        statuses: Vec<String>,
    ) -> Result<Self, Error> {
        check_not_empty("users", &users)?;
        check_not_empty("merchants", &merchants)?;
        check_labels("currencies", &currencies)?;
        check_labels("payment_methods", &payment_methods)?;
        check_labels("statuses", &statuses)?;

        let mut user_index = HashSet::with_capacity(users.len());
        for user in &users {
            if !is_valid_user_id(user) {
                return Err(make_config_err!("Malformed user id : {:?}", user));
            }
            if !user_index.insert(user.clone()) {
                return Err(make_config_err!("Duplicate user id : {:?}", user));
            }
        }

        let mut merchant_index = HashMap::with_capacity(merchants.len());
        for (i, merchant) in merchants.iter().enumerate() {
            if !is_valid_merchant_id(&merchant.id) {
                return Err(make_config_err!("Malformed merchant id : {:?}", merchant.id));
            }
            if merchant.category.trim().is_empty() {
                return Err(make_config_err!(
                    "Merchant ({}) has no category",
                    merchant.id
                ));
            }
            if merchant_index.insert(merchant.id.clone(), i).is_some() {
                return Err(make_config_err!("Duplicate merchant id : {:?}", merchant.id));
            }
        }

        debug!(
            users = users.len(),
            merchants = merchants.len(),
            currencies = currencies.len(),
            payment_methods = payment_methods.len(),
            statuses = statuses.len(),
            "built reference pools"
        );
        Ok(Self {
            users,
            user_index,
            merchants,
            merchant_index,
            currencies,
            payment_methods,
            statuses,
        })
    }

    /// Builds the standard pools with `num_users` users and `num_merchants` merchants.
    pub fn with_counts(num_users: usize, num_merchants: usize) -> Result<Self, Error> {
        if num_users > MAX_USER_COUNT {
            return Err(make_config_err!(
                "At most {} users are supported, got {}",
                MAX_USER_COUNT,
                num_users
            ));
        }
        if num_merchants > MAX_MERCHANT_COUNT {
            return Err(make_config_err!(
                "At most {} merchants are supported, got {}",
                MAX_MERCHANT_COUNT,
                num_merchants
            ));
        }
        let users = (1..=num_users).map(user_id).collect();
        let merchants = (1..=num_merchants)
            .map(|n| {
                Merchant::new(
                    merchant_id(n),
                    MERCHANT_CATEGORIES[(n - 1) % MERCHANT_CATEGORIES.len()],
                )
            })
            .collect();
        Self::new(
            users,
            merchants,
            to_owned_vec(&CURRENCIES),
            to_owned_vec(&PAYMENT_METHODS),
            to_owned_vec(&STATUSES),
        )
    }

    /// The process-wide default pools, built on first use and never modified.
    pub fn standard() -> Arc<ReferencePools> {
        static STANDARD: OnceLock<Arc<ReferencePools>> = OnceLock::new();
        STANDARD
            .get_or_init(|| {
                // The default sizes are within bounds and the default labels are non-empty,
                // so this can only fail if the constants above are edited badly.
                let pools = ReferencePools::with_counts(DEFAULT_USER_COUNT, DEFAULT_MERCHANT_COUNT)
                    .unwrap_or_else(|e| panic!("Standard reference pools are invalid : {}", e));
                Arc::new(pools)
            })
            .clone()
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn merchants(&self) -> &[Merchant] {
        &self.merchants
    }

    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    pub fn payment_methods(&self) -> &[String] {
        &self.payment_methods
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn contains_user(&self, user_id: &str) -> bool {
        self.user_index.contains(user_id)
    }

    /// Looks up the merchant registered under `merchant_id`.
    pub fn merchant(&self, merchant_id: &str) -> Option<&Merchant> {
        self.merchant_index
            .get(merchant_id)
            .map(|&i| &self.merchants[i])
    }
}

fn to_owned_vec(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
