//! pdfpress - Shrink, merge, split, and unlock PDF files.

use clap::Parser;
use std::process;

use pdfpress::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    // RUST_LOG still wins over the -v flags when set.
    env_logger::Builder::new()
        .filter_level(filter)
        .parse_default_env()
        .init();

    match pdfpress::run(cli).await {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(err.exit_code());
        }
    }
}
