//! candy-mint command line
//!
//! Mints one NFT from a candy machine and prints the transaction signature.

// Compiler warning configuration
#![deny(unused_imports)]
#![deny(unused_mut)]
#![deny(unused_variables)]
#![warn(unused_must_use)]

use anyhow::{Context, Result};
use candy_mint::{mint_with_settings, Pubkey, Settings};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long, global = true, env = "CANDY_MINT_SETTINGS", default_value = "candy-mint.toml")]
    settings: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mint one NFT from a candy machine
    Mint {
        /// Payer keypair file
        #[arg(short, long, env = "CANDY_MINT_KEYPAIR", default_value = "~/.config/solana/id.json")]
        keypair: String,

        /// Cluster name (devnet, testnet, mainnet-beta, localnet) or RPC URL
        #[arg(short, long, default_value = "devnet")]
        env: String,

        /// Candy machine config account
        #[arg(short, long)]
        config_address: Pubkey,

        /// RPC endpoint overriding the cluster's public one
        #[arg(long, env = "CANDY_MINT_RPC_URL")]
        rpc_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.json_logs)?;

    let mut settings = Settings::load(Some(&args.settings))
        .with_context(|| format!("Failed to load settings from {}", args.settings))?;

    match args.command {
        Command::Mint {
            keypair,
            env,
            config_address,
            rpc_url,
        } => {
            if rpc_url.is_some() {
                settings.rpc.url = rpc_url;
            }

            info!(env = %env, config = %config_address, "Minting from candy machine");
            match mint_with_settings(&keypair, &env, &config_address, &settings).await {
                Ok(txid) => {
                    println!("{}", txid);
                    Ok(())
                }
                Err(e) => {
                    error!(category = e.category(), error = %e, "Mint failed");
                    Err(e).context("Mint failed")
                }
            }
        }
    }
}

/// Initialize logging subsystem
fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let env_filter = if verbose {
        "candy_mint=debug,info"
    } else {
        "candy_mint=info,warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| env_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    }

    Ok(())
}
