//! Pesquerías MX Command-Line Client
//!
//! Queries the embedded fisheries catalog and, with a configured database,
//! prints production statistics.

mod commands;
mod formatter;

use clap::Parser;
use commands::Command;
use formatter::OutputFormat;
use pesca_store::{PgArgs, StoreConfig};
use tracing_subscriber::EnvFilter;

/// Pesquerías MX Command-Line Client
#[derive(Parser, Debug)]
#[command(name = "pesca")]
#[command(version, about = "Pesquerías MX Command-Line Client")]
pub struct Args {
    /// Output format
    #[arg(long, default_value = "table", value_enum, global = true)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub pg: PgArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pesca_cli=warn")),
        )
        .init();

    let args = Args::parse();
    let formatter = formatter::create_formatter(args.format);

    match commands::execute(args.command, &StoreConfig::from(&args.pg), &*formatter).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
