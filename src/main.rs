// Copyright 2022 Nathan (Blaise) Bruer.  All rights reserved.

use clap::Parser;
use tokio::io::stdout;
use tracing::error;

use transaction_generator::logging::{init_logging, DEFAULT_LOG_LEVEL};
use transaction_generator::{run_with_args, Args};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(DEFAULT_LOG_LEVEL, args.log_format);
    if let Err(err) = run_with_args(args, stdout()).await {
        error!("{}", err);
        std::process::exit(1);
    }
}
