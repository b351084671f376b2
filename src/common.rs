// Copyright 2022 Nathan (Blaise) Bruer.  All rights reserved.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Number of fractional digits every amount carries.
pub const AMOUNT_SCALE: i64 = 2;

/// Largest amount in cents, 9_999_999_999_999.99. Fifteen significant digits is the
/// most an f64 carries through a decimal round trip, so anything above this could
/// come back from JSON as a different amount.
pub const MAX_AMOUNT_CENTS: u64 = 999_999_999_999_999;

/// A merchant and the category it trades in. The category is part of the merchant
/// and is never chosen on its own.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct Merchant {
    pub id: String,
    pub category: String,
}

impl Merchant {
    pub fn new(id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

/// One synthesized transaction. Field order matches the wire layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    pub txn_id: String,
    pub user_id: String,
    #[serde(with = "amount_as_float")]
    pub amount: BigDecimal,
    pub currency: String,
    pub timestamp: String,
    pub merchant_id: String,
    pub merchant_category: String,
    pub payment_method: String,
    pub status: String,
    pub location: Location,
}

/// Amounts live in memory as exact decimals but travel as JSON floats.
pub(crate) mod amount_as_float {
    use bigdecimal::BigDecimal;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{AMOUNT_SCALE, MAX_AMOUNT_CENTS};

    pub fn serialize<S: Serializer>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        // Going through the decimal string gives the closest f64, which serde_json
        // then prints with no more than two fractional digits.
        let value = amount
            .to_string()
            .parse::<f64>()
            .map_err(|e| S::Error::custom(format!("amount {} is not a float: {}", amount, e)))?;
        serializer.serialize_f64(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() || value <= 0.0 {
            return Err(D::Error::custom(format!("amount {} must be positive", value)));
        }
        if value > MAX_AMOUNT_CENTS as f64 / 100.0 {
            return Err(D::Error::custom(format!("amount {} is too large", value)));
        }
        let text = format!("{:.*}", AMOUNT_SCALE as usize, value);
        if text.parse::<f64>().ok() != Some(value) {
            return Err(D::Error::custom(format!(
                "amount {} has more than {} decimal places",
                value, AMOUNT_SCALE
            )));
        }
        text.parse::<BigDecimal>()
            .map_err(|e| D::Error::custom(format!("amount {} is not a decimal: {}", value, e)))
    }
}
