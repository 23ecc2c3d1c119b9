//! # kasir-cli: Command-line caller for Kasir POS
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Command Startup                                   │
//! │                                                                         │
//! │  1. Parse arguments (clap) ───────────────────────────────────────────► │
//! │  2. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr            │
//! │     • Default: info,kasir=debug,sqlx=warn; override with RUST_LOG      │
//! │  3. Load configuration from KASIR_* variables ───────────────────────► │
//! │  4. Open database, run pending migrations ───────────────────────────► │
//! │  5. Run the command, print JSON to stdout ───────────────────────────► │
//! │     • failure: {"code","message"} on stderr, exit status 1             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::KasirConfig;
use error::ApiError;
use kasir_db::Database;

/// Kasir POS checkout and sales reports.
#[derive(Parser, Debug)]
#[command(name = "kasir", author, version, about, long_about = None)]
pub struct Cli {
    /// Database file, overrides KASIR_DATABASE_PATH
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sell items atomically: all lines or none
    Checkout {
        /// Items as PRODUCT_ID:QTY, processed in order
        items: Vec<String>,
    },

    /// Sales reports
    #[command(subcommand)]
    Report(ReportCommand),

    /// Show one committed transaction
    Transaction {
        id: i64,
    },

    /// List products and their stock
    Products,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// Today's sales, or one calendar day's
    Daily {
        /// Calendar day as YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Sales in [start, end)
    Range {
        #[arg(long)]
        start: String,

        /// A date-only end includes that whole day
        #[arg(long)]
        end: String,
    },
}

/// Runs one command and returns its JSON output.
pub async fn run(cli: Cli) -> Result<String, ApiError> {
    let mut config = KasirConfig::load()?;
    if let Some(path) = cli.db {
        config.database_path = path;
    }

    info!(
        path = %config.database_path.display(),
        utc_offset = %config.utc_offset,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config()).await?;
    let output = dispatch(&db, &config, cli.command).await;
    db.close().await;

    output
}

/// Routes a parsed command to its handler.
pub async fn dispatch(
    db: &Database,
    config: &KasirConfig,
    command: Command,
) -> Result<String, ApiError> {
    match command {
        Command::Checkout { items } => to_json(&commands::checkout::run(db, &items).await?),
        Command::Report(ReportCommand::Daily { date }) => {
            to_json(&commands::report::daily(db, config.date_parser(), date).await?)
        }
        Command::Report(ReportCommand::Range { start, end }) => {
            to_json(&commands::report::range(db, config.date_parser(), &start, &end).await?)
        }
        Command::Transaction { id } => to_json(&commands::transaction::show(db, id).await?),
        Command::Products => to_json(&commands::product::list(db).await?),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::storage(format!("Failed to encode output: {}", e)))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kasir_db=trace` - Show trace for the database crate only
/// - Default: INFO, DEBUG for kasir crates
///
/// Logs go to stderr so stdout carries only command output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kasir=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use kasir_core::NewProduct;
    use kasir_db::DbConfig;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("kasir").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_parsing() {
        let cli = parse(&["checkout", "1:2", "3:1"]);
        assert!(matches!(cli.command, Command::Checkout { ref items } if items.len() == 2));

        let cli = parse(&["report", "range", "--start", "2024-05-01", "--end", "2024-05-02"]);
        assert!(matches!(
            cli.command,
            Command::Report(ReportCommand::Range { ref start, ref end })
                if start == "2024-05-01" && end == "2024-05-02"
        ));

        let cli = parse(&["--db", "/tmp/toko.db", "report", "daily", "--date", "2024-05-01"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/toko.db")));
        assert!(matches!(
            cli.command,
            Command::Report(ReportCommand::Daily { date: Some(_) })
        ));

        assert!(Cli::try_parse_from(["kasir", "report", "daily", "--date", "May 1"]).is_err());
    }

    #[tokio::test]
    async fn test_dispatch_prints_json() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .insert(&NewProduct::new("BahleelOil", 9000, 20))
            .await
            .unwrap();
        let config = KasirConfig::from_lookup(|_| None).unwrap();

        let out = dispatch(&db, &config, parse(&["checkout", "1:2"]).command)
            .await
            .unwrap();
        let txn: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(txn["total_amount"], 18000);
        assert_eq!(txn["details"][0]["product_name"], "BahleelOil");

        let out = dispatch(&db, &config, parse(&["report", "daily"]).command)
            .await
            .unwrap();
        let report: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["total_transactions"], 1);
        assert_eq!(report["top_product"]["quantity_sold"], 2);

        let out = dispatch(&db, &config, Command::Products).await.unwrap();
        let products: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(products[0]["stock"], 18);
    }
}
