// Copyright 2022 Nathan (Blaise) Bruer.  All rights reserved.

use std::env;
use std::ffi::OsString;

use bigdecimal::BigDecimal;
use clap::Parser;
use num_cpus::get as get_num_cpus;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::info;

mod error;
#[cfg(test)]
mod tests; // Failing to do this results in zero unit tests being run.
pub use error::{Error, ErrorKind};
pub mod common;
pub use common::{Location, Merchant, Transaction};
pub mod pools;
pub use pools::ReferencePools;
pub mod synth;
pub mod txn_id;
pub use txn_id::{idempotent_id, idempotent_id_with};
pub mod generator;
pub use generator::{generate_transaction, GeneratorConfig, TransactionGenerator};
mod batch_producer;
pub use batch_producer::BatchProducer;
pub mod logging;
use logging::LogFormat;

/// Environment variable overriding the number of generator workers.
pub const WORKER_SPAWNS_ENV: &str = "TXN_GENERATOR_WORKER_SPAWNS";

/// Command line arguments holder.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Number of transactions to generate.
    #[clap(long, default_value_t = 1000)]
    pub count: usize,

    /// Size of the user pool.
    #[clap(long, default_value_t = pools::DEFAULT_USER_COUNT)]
    pub users: usize,

    /// Size of the merchant pool.
    #[clap(long, default_value_t = pools::DEFAULT_MERCHANT_COUNT)]
    pub merchants: usize,

    /// Smallest amount to generate.
    #[clap(long, default_value = "1.00")]
    pub min_amount: BigDecimal,

    /// Largest amount to generate.
    #[clap(long, default_value = "5000.00")]
    pub max_amount: BigDecimal,

    /// Spread timestamps over this many seconds before now (0 = always now).
    #[clap(long, default_value_t = 0)]
    pub timestamp_jitter_secs: u64,

    /// Seed for reproducible output.
    #[clap(long)]
    pub seed: Option<u64>,

    /// Log output format, `pretty` or `json`.
    #[clap(long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Worker count from the raw value of `WORKER_SPAWNS_ENV`, defaulting to the number
/// of cpus when unset.
fn parse_worker_count(value: Option<OsString>) -> Result<usize, Error> {
    let value = match value {
        None => return Ok(get_num_cpus()),
        Some(value) => value,
    };
    match value.to_str().and_then(|v| v.parse::<usize>().ok()) {
        Some(0) => Err(make_config_err!("{} env must be at least 1", WORKER_SPAWNS_ENV)),
        Some(num_workers) => Ok(num_workers),
        None => Err(make_config_err!(
            "Could not convert {} env ({:?}) to usize",
            WORKER_SPAWNS_ENV,
            value
        )),
    }
}

/// For the given args will build the reference pools, generate `args.count` transactions
/// over a pool of workers and write them to `writer` as JSON lines. Returns how many
/// transactions were written.
/// Note: This is effectively a main() function, but in order to make unit testing easier
/// it is separated.
pub async fn run_with_args(args: Args, writer: impl AsyncWrite + Unpin) -> Result<usize, Error> {
    let mut producer = {
        // Setup and configure our classes and utilities.
        let pools = std::sync::Arc::new(ReferencePools::with_counts(args.users, args.merchants)?);
        let config = GeneratorConfig {
            min_amount: args.min_amount,
            max_amount: args.max_amount,
            timestamp_jitter_secs: args.timestamp_jitter_secs,
        };
        let num_workers = parse_worker_count(env::var_os(WORKER_SPAWNS_ENV))?;
        BatchProducer::new(pools, config, args.count, num_workers, args.seed)?
    };

    let mut writer = BufWriter::new(writer);
    let mut written = 0;
    while let Some(transaction) = producer.next_transaction().await {
        let mut line = serde_json::to_string(&transaction)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        written += 1;
    }
    writer.flush().await?; // Nothing reaches the caller's writer until this.

    let produced = producer.finish().await?;
    info!(written, produced, "finished generating transactions");
    Ok(written)
}
