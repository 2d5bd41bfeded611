use clap::Parser;
use gstfetch_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.log_stderr {
        logging::init_logging_stderr();
    } else if let Err(err) = logging::init_logging() {
        eprintln!("gstfetch: file logging unavailable ({:#}), logging to stderr", err);
        logging::init_logging_stderr();
    }

    if let Err(err) = cli.run().await {
        eprintln!("gstfetch error: {:#}", err);
        // Surface the failure as a workflow annotation when running under GitHub Actions.
        if std::env::var_os("GITHUB_ACTIONS").is_some() {
            println!("::error::{}", crate::cli::annotation_message(&err));
        }
        std::process::exit(1);
    }
}
