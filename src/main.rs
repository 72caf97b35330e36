//! EVM Multi-Sender - sweep many wallets into one address
//!
//! # WARNING
//! - Transfers are irreversible. Double-check the recipient address.
//! - Private keys are uploaded to the configured backend. Only point this
//!   tool at a backend you run yourself.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

// Use the library crate
use evm_multisender::cli::{commands, NetworkArgs};
use evm_multisender::config::Config;

/// EVM Multi-Sender - bulk wallet transfer client
#[derive(Parser)]
#[command(name = "multisend")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "multisender.toml")]
    config: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List predefined networks
    Networks,

    /// Show current configuration
    Config,

    /// Import a key file and show every wallet's balance
    Balances {
        /// Private key file (.txt, one key per line)
        #[arg(short, long)]
        keys: PathBuf,

        #[command(flatten)]
        network: NetworkArgs,
    },

    /// Send a share of every wallet's balance to one recipient
    Send {
        /// Private key file (.txt, one key per line)
        #[arg(short, long)]
        keys: PathBuf,

        #[command(flatten)]
        network: NetworkArgs,

        /// Recipient address (0x + 40 hex characters)
        #[arg(short, long)]
        recipient: String,

        /// Share of each balance: 25, 50, 75 or max
        #[arg(short, long)]
        percentage: Option<String>,

        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.json);

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Networks => commands::list_networks(),
        Commands::Config => commands::show_config(&config),
        Commands::Balances { keys, network } => commands::balances(&config, &keys, &network).await,
        Commands::Send {
            keys,
            network,
            recipient,
            percentage,
            force,
        } => {
            commands::send(
                &config,
                &keys,
                &network,
                &recipient,
                percentage.as_deref(),
                force,
            )
            .await
        }
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        eprintln!("\nError: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        "evm_multisender=info"
            .parse()
            .expect("static log directive is valid"),
    );

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
