// Copyright 2022 Nathan (Blaise) Bruer.  All rights reserved.

use std::collections::HashSet;
use std::ffi::OsString;

use bigdecimal::BigDecimal;
use pretty_assertions::assert_eq; // Gives easier to read output for assert errors.
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::try_join;

use crate::logging::LogFormat;
use crate::pools::ReferencePools;
use crate::txn_id::is_txn_id;
use crate::{parse_worker_count, run_with_args, Args, Error, ErrorKind, Transaction};

fn args(count: usize) -> Args {
    Args {
        count,
        users: 100,
        merchants: 10,
        min_amount: "1.00".parse().unwrap(),
        max_amount: "20.00".parse().unwrap(),
        timestamp_jitter_secs: 60,
        seed: None,
        log_format: LogFormat::Pretty,
    }
}

/// Runs the generator with `args` and collects what it wrote, line by line.
async fn run_and_collect(args: Args) -> Result<(usize, Vec<String>), Error> {
    // Configure a future that will process the output of our program into a vector by line.
    const BUFFER_SIZE: usize = 1024;
    let (tx, rx) = io::duplex(BUFFER_SIZE);
    let reader_spawn_fut = async move {
        let mut buf_reader = BufReader::new(rx);
        let mut output_data = vec![];
        loop {
            let mut line = String::new();
            let bytes_read = buf_reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                break; // EOF.
            }
            output_data.push(line);
        }
        Result::<Vec<String>, Error>::Ok(output_data)
    };
    try_join!(run_with_args(args, tx), reader_spawn_fut)
}

#[tokio::test]
async fn writes_one_json_line_per_transaction_test() -> Result<(), Error> {
    const COUNT: usize = 500;
    let (written, output_lines) = run_and_collect(args(COUNT)).await?;
    assert_eq!(written, COUNT);
    assert_eq!(output_lines.len(), COUNT);

    let pools = ReferencePools::with_counts(100, 10)?;
    let mut ids = HashSet::new();
    for line in &output_lines {
        assert!(line.ends_with('\n'));
        let transaction: Transaction = serde_json::from_str(line)?;
        assert!(is_txn_id(&transaction.txn_id));
        assert!(pools.contains_user(&transaction.user_id));
        assert_eq!(
            Some(transaction.merchant_category.as_str()),
            pools
                .merchant(&transaction.merchant_id)
                .map(|m| m.category.as_str())
        );
        assert!(transaction.amount >= "1.00".parse::<BigDecimal>().unwrap());
        assert!(transaction.amount <= "20.00".parse::<BigDecimal>().unwrap());
        ids.insert(transaction.txn_id);
    }
    assert_eq!(ids.len(), COUNT);
    Ok(())
}

#[tokio::test]
async fn zero_count_writes_nothing_test() -> Result<(), Error> {
    let (written, output_lines) = run_and_collect(args(0)).await?;
    assert_eq!(written, 0);
    assert_eq!(output_lines, Vec::<String>::new());
    Ok(())
}

#[tokio::test]
async fn bad_pool_size_fails_fast_test() {
    let mut bad_args = args(10);
    bad_args.users = 0;
    let err = run_with_args(bad_args, io::sink()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
}

#[tokio::test]
async fn bad_amount_range_fails_fast_test() {
    let mut bad_args = args(10);
    bad_args.min_amount = "30.00".parse().unwrap();
    let err = run_with_args(bad_args, io::sink()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
}

#[test]
fn log_format_parses_test() {
    assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
    assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
    assert_eq!(
        "xml".parse::<LogFormat>().unwrap_err().kind,
        ErrorKind::Configuration
    );
}

#[test]
fn worker_count_env_parses_test() -> Result<(), Error> {
    assert_eq!(parse_worker_count(None)?, num_cpus::get());
    assert_eq!(parse_worker_count(Some(OsString::from("4")))?, 4);
    for bad_value in ["abc", "0", "-2", ""] {
        let err = parse_worker_count(Some(OsString::from(bad_value))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration, "{:?}", bad_value);
    }
    Ok(())
}
