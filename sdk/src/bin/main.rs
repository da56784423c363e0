// CLI tool for the Yield Market program
//
// Read-only: inspects protocol config and deal listings, derives program
// addresses and explains program error codes. No keys are loaded.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::utils::CliContext;

#[derive(Parser)]
#[command(name = "yield-market")]
#[command(about = "Yield Market CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// RPC URL to connect to (defaults to YIELD_MARKET_RPC_URL, then devnet)
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Program ID (defaults to YIELD_MARKET_PROGRAM_ID, then the declared program ID)
    #[arg(long, global = true)]
    program_id: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the protocol configuration
    Config,

    /// Check whether the protocol is paused
    Paused,

    /// Derive program addresses
    Pda(commands::protocol::PdaCmd),

    /// Show a single deal
    Deal(commands::deals::DealCmd),

    /// List deals, optionally filtered
    Deals(commands::deals::DealsCmd),

    /// Explain a program error code
    ExplainError(commands::protocol::ExplainErrorCmd),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("yield_market_sdk={},yield_market={}", default_level, default_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = CliContext::new(cli.rpc_url.as_deref(), cli.program_id.as_deref(), cli.json)?;

    // Execute command
    match cli.command {
        Commands::Config => commands::protocol::show_config(&ctx).await,
        Commands::Paused => commands::protocol::show_paused(&ctx).await,
        Commands::Pda(cmd) => commands::protocol::derive_pda(cmd, &ctx),
        Commands::Deal(cmd) => commands::deals::show_deal(cmd, &ctx).await,
        Commands::Deals(cmd) => commands::deals::list_deals(cmd, &ctx).await,
        Commands::ExplainError(cmd) => commands::protocol::explain_error(cmd, &ctx),
    }
}
