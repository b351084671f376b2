// Copyright 2022 Nathan (Blaise) Bruer.  All rights reserved.

use bigdecimal::BigDecimal;
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::{Builder as UuidBuilder, Uuid};

/// Width of a transaction id in hex characters.
pub const TXN_ID_LEN: usize = 24;

/// Builds a transaction id from the transaction's attributes and a fresh random
/// nonce drawn from `rng`.
///
/// Despite the name this is NOT content-addressed: the nonce makes two calls with
/// identical inputs return different ids. Whether dedup by content was ever the
/// intent is unresolved, so the collision-free behavior is preserved.
pub fn idempotent_id_with<R: Rng + ?Sized>(
    rng: &mut R,
    user_id: &str,
    timestamp: &str,
    amount: &BigDecimal,
) -> String {
    let nonce: Uuid = UuidBuilder::from_random_bytes(rng.gen()).into_uuid();

    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(b"|");
    hasher.update(timestamp.as_bytes());
    hasher.update(b"|");
    hasher.update(amount.to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(nonce.as_bytes());
    let digest = hasher.finalize();

    hex::encode(&digest[..TXN_ID_LEN / 2])
}

/// Same as [`idempotent_id_with`] using the calling thread's rng.
pub fn idempotent_id(user_id: &str, timestamp: &str, amount: &BigDecimal) -> String {
    idempotent_id_with(&mut rand::thread_rng(), user_id, timestamp, amount)
}

/// True if `value` has the shape of a transaction id.
pub fn is_txn_id(value: &str) -> bool {
    value.len() == TXN_ID_LEN && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
