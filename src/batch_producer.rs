// Copyright 2022 Nathan (Blaise) Bruer.  All rights reserved.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::common::Transaction;
use crate::generator::{GeneratorConfig, TransactionGenerator};
use crate::pools::ReferencePools;
use crate::{make_config_err, Error};

/// Number of transactions allowed to be in the cross-spawn channel before
/// backpressure is applied to the workers.
const CHANNEL_BUFFER_SIZE: usize = 256;

/// This is designed to be run in a `tokio::spawn`. It generates `count` transactions
/// with a generator owned by this worker alone and pushes them into `tx`. Returns
/// how many were handed off; stops early if the receiving side went away.
async fn produce_transactions(
    worker_index: usize,
    mut generator: TransactionGenerator,
    count: usize,
    tx: mpsc::Sender<Transaction>,
) -> Result<usize, Error> {
    for produced in 0..count {
        if tx.send(generator.generate_transaction()).await.is_err() {
            debug!(worker_index, produced, "receiver closed, stopping worker");
            return Ok(produced);
        }
    }
    debug!(worker_index, produced = count, "worker finished");
    Ok(count)
}

/// Share of `count` for worker `worker_index`; the first `count % num_workers`
/// workers take one extra so the shares always add up to `count`.
fn worker_share(count: usize, num_workers: usize, worker_index: usize) -> usize {
    count / num_workers + usize::from(worker_index < count % num_workers)
}

/// BatchProducer fans transaction generation out over N workers and funnels their
/// output back through a single bounded channel.
///
/// Each worker owns its own `TransactionGenerator` and therefore its own rng, so no
/// entropy source is ever shared between threads. The reference pools are shared
/// read-only through an `Arc`. Records from different workers interleave in no
/// particular order.
pub struct BatchProducer {
    rx: mpsc::Receiver<Transaction>,
    workers: Vec<JoinHandle<Result<usize, Error>>>,
}

impl BatchProducer {
    /// Spawns the workers. Must be called from within a tokio runtime.
    ///
    /// With a `seed`, worker `i` is seeded with `seed + i`, which makes the set of
    /// generated records reproducible when the generator clock is too.
    pub fn new(
        pools: Arc<ReferencePools>,
        config: GeneratorConfig,
        count: usize,
        num_workers: usize,
        seed: Option<u64>,
    ) -> Result<Self, Error> {
        if num_workers == 0 {
            return Err(make_config_err!(
                "`num_workers` must be at least 1 in BatchProducer"
            ));
        }
        if num_workers >= u16::MAX.into() {
            return Err(make_config_err!(
                "`num_workers` must be less than u16::MAX in BatchProducer, got {}",
                num_workers
            ));
        }

        // Build every generator before spawning anything so a bad config never
        // leaves half the workers running.
        let mut generators = Vec::with_capacity(num_workers);
        for worker_index in 0..num_workers {
            let generator = match seed {
                Some(seed) => TransactionGenerator::seeded(
                    pools.clone(),
                    config.clone(),
                    seed.wrapping_add(worker_index as u64),
                )?,
                None => TransactionGenerator::from_entropy(pools.clone(), config.clone())?,
            };
            generators.push(generator);
        }

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let workers = generators
            .into_iter()
            .enumerate()
            .map(|(worker_index, generator)| {
                let share = worker_share(count, num_workers, worker_index);
                tokio::spawn(produce_transactions(
                    worker_index,
                    generator,
                    share,
                    tx.clone(),
                ))
            })
            .collect();
        info!(count, num_workers, seeded = seed.is_some(), "started batch producer");
        Ok(Self { rx, workers })
    }

    /// Next generated transaction, or `None` once every worker is done.
    pub async fn next_transaction(&mut self) -> Option<Transaction> {
        self.rx.recv().await
    }

    /// Stops receiving, joins all workers and returns how many transactions they
    /// handed off in total.
    pub async fn finish(self) -> Result<usize, Error> {
        drop(self.rx); // Unblocks any worker still waiting on a full channel.
        let mut total = 0;
        for join_handle in self.workers {
            total += join_handle.await??;
        }
        Ok(total)
    }
}
