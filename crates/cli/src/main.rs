//! `validecor` binary.
//!
//! ```bash
//! validecor check --signature transfer.json --args '["250"]'
//! RUST_LOG=validecor=debug validecor --log-format json check --signature transfer.json --args '[]'
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use validators::Registry;
use validecor_cli::{run, Cli, LogFormat, Outcome};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable (respects RUST_LOG).
    let subscriber = tracing_subscriber::registry().with(EnvFilter::from_default_env());
    match cli.log_format {
        LogFormat::Text => subscriber.with(fmt::layer().with_writer(std::io::stderr)).init(),
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    match run(&cli.command, &Registry::with_builtins())? {
        Outcome::Output(text) => {
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Rejected(err) => {
            eprintln!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}
