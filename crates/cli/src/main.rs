//! Depot CLI - scripting access to the inventory backend.
//!
//! # Usage
//!
//! ```bash
//! # Stock levels, optionally for one warehouse or only low rows
//! depot stock --warehouse 2 --low
//!
//! # Manual correction
//! depot adjust --product 7 --warehouse 2 --delta -3 --reason "damaged"
//!
//! # Transfers
//! depot transfer create --product 7 --from 1 --to 2 --quantity 10
//! depot transfer approve 41
//!
//! # Alerts and reports
//! depot alerts --all
//! depot alerts resolve 9
//! depot report top --limit 5
//! ```
//!
//! # Environment Variables
//!
//! - `DEPOT_API_URL` - Base URL of the inventory backend (or `--api-url`)
//! - `DEPOT_API_TOKEN` - Bearer token (or `--token`)
//! - `RUST_LOG` - Log filter (default: `depot_cli=warn`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use clap::{Parser, Subcommand};
use depot_admin::backend::BackendClient;
use depot_admin::config::{BackendConfig, ConfigError};
use depot_core::{AlertId, ProductId, TransferId, WarehouseId};

mod commands;
mod output;

use commands::CliError;

#[derive(Parser)]
#[command(name = "depot")]
#[command(author, version, about = "Depot inventory command-line tool")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "DEPOT_API_URL", global = true)]
    api_url: Option<String>,

    /// Backend bearer token
    #[arg(long, env = "DEPOT_API_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout: u64,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show stock levels
    Stock {
        /// Only this warehouse
        #[arg(short, long)]
        warehouse: Option<WarehouseId>,

        /// Only rows at or below their reorder level
        #[arg(long)]
        low: bool,

        /// Reorder level for products without one
        #[arg(long, default_value_t = 10)]
        threshold: i64,
    },
    /// Apply a manual stock adjustment
    Adjust {
        #[arg(short, long)]
        product: ProductId,

        #[arg(short, long)]
        warehouse: WarehouseId,

        /// Units to add (negative to remove)
        #[arg(short, long, allow_hyphen_values = true)]
        delta: i64,

        #[arg(short, long)]
        reason: Option<String>,
    },
    /// Manage stock transfers
    Transfer {
        #[command(subcommand)]
        action: TransferAction,
    },
    /// List or resolve low-stock alerts
    Alerts {
        /// Include resolved alerts
        #[arg(long)]
        all: bool,

        #[command(subcommand)]
        action: Option<AlertAction>,
    },
    /// Print backend reports
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },
}

#[derive(Subcommand)]
enum TransferAction {
    /// List transfers
    List,
    /// Request a transfer between two warehouses
    Create {
        #[arg(short, long)]
        product: ProductId,

        #[arg(long)]
        from: WarehouseId,

        #[arg(long)]
        to: WarehouseId,

        #[arg(short, long)]
        quantity: i64,

        #[arg(short, long)]
        note: Option<String>,
    },
    /// Approve a pending transfer
    Approve { id: TransferId },
    /// Reject a pending transfer
    Reject { id: TransferId },
    /// Mark an approved transfer as completed
    Complete { id: TransferId },
}

#[derive(Subcommand)]
enum AlertAction {
    /// Mark an alert as resolved
    Resolve { id: AlertId },
}

#[derive(Subcommand)]
enum ReportKind {
    /// Headline counts
    Summary,
    /// Units held per warehouse
    Warehouses,
    /// Best-selling products
    Top {
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "depot_cli=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        output::fail(&e);
        std::process::exit(1);
    }
}

fn client(cli: &Cli) -> Result<BackendClient, CliError> {
    let url = cli
        .api_url
        .as_deref()
        .ok_or_else(|| ConfigError::MissingEnvVar("DEPOT_API_URL".to_string()))?;
    let config = BackendConfig::new(url, cli.token.clone(), Duration::from_secs(cli.timeout))?;
    if config.token_looks_like_placeholder() {
        tracing::warn!("DEPOT_API_TOKEN looks like a placeholder value");
    }
    Ok(BackendClient::new(config)?)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = client(&cli)?;
    let json = cli.json;

    match cli.command {
        Commands::Stock {
            warehouse,
            low,
            threshold,
        } => commands::inventory::stock(&client, warehouse, low, threshold, json).await?,
        Commands::Adjust {
            product,
            warehouse,
            delta,
            reason,
        } => {
            commands::inventory::adjust(&client, product, warehouse, delta, reason.as_deref())
                .await?;
        }
        Commands::Transfer { action } => match action {
            TransferAction::List => commands::transfer::list(&client, json).await?,
            TransferAction::Create {
                product,
                from,
                to,
                quantity,
                note,
            } => {
                let request = commands::transfer::TransferRequest {
                    product,
                    from,
                    to,
                    quantity,
                    note,
                };
                commands::transfer::create(&client, &request).await?;
            }
            TransferAction::Approve { id } => {
                commands::transfer::approve(&client, id).await?;
            }
            TransferAction::Reject { id } => commands::transfer::reject(&client, id).await?,
            TransferAction::Complete { id } => {
                commands::transfer::complete(&client, id).await?;
            }
        },
        Commands::Alerts { all, action } => match action {
            None => commands::alerts::list(&client, all, json).await?,
            Some(AlertAction::Resolve { id }) => commands::alerts::resolve(&client, id).await?,
        },
        Commands::Report { kind } => match kind {
            ReportKind::Summary => commands::report::summary(&client, json).await?,
            ReportKind::Warehouses => commands::report::warehouses(&client, json).await?,
            ReportKind::Top { limit } => commands::report::top(&client, limit, json).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_delta_parses() {
        let cli = Cli::try_parse_from([
            "depot", "--api-url", "http://api.local", "adjust", "-p", "7", "-w", "2", "-d", "-3",
        ])
        .unwrap();
        match cli.command {
            Commands::Adjust {
                product,
                warehouse,
                delta,
                reason,
            } => {
                assert_eq!(product, ProductId::new(7));
                assert_eq!(warehouse, WarehouseId::new(2));
                assert_eq!(delta, -3);
                assert_eq!(reason, None);
            }
            _ => panic!("expected adjust"),
        }
    }

    #[test]
    fn test_invalid_id_is_rejected() {
        assert!(Cli::try_parse_from(["depot", "transfer", "approve", "zero"]).is_err());
        assert!(Cli::try_parse_from(["depot", "transfer", "approve", "0"]).is_err());
    }

    #[test]
    fn test_alerts_with_and_without_subcommand() {
        let cli = Cli::try_parse_from(["depot", "alerts", "--all"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Alerts {
                all: true,
                action: None
            }
        ));

        let cli = Cli::try_parse_from(["depot", "alerts", "resolve", "9"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Alerts {
                action: Some(AlertAction::Resolve { .. }),
                ..
            }
        ));
    }
}
