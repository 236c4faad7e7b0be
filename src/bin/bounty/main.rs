//! Base Bounty CLI
//!
//! Command-line interface for posting bounties on Base Sepolia.

mod app;
mod commands;
mod style;
mod wizard;

use std::path::PathBuf;

use anyhow::Result;
use base_bounty::Config;
use clap::{Parser, Subcommand};
use style::*;
use tracing_subscriber::EnvFilter;

const BANNER: &str = r#"
  ██████╗  █████╗ ███████╗███████╗
  ██╔══██╗██╔══██╗██╔════╝██╔════╝
  ██████╔╝███████║███████╗█████╗
  ██╔══██╗██╔══██║╚════██║██╔══╝
  ██████╔╝██║  ██║███████║███████╗
  ╚═════╝ ╚═╝  ╚═╝╚══════╝╚══════╝
"#;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "bounty")]
#[command(version)]
#[command(about = "Base Bounty Q&A - Decentralized bounties on Coinbase Base", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to config.toml
    #[arg(short, long, env = "BOUNTY_CONFIG", default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Chain RPC endpoint (overrides config)
    #[arg(short, long, global = true)]
    rpc: Option<String>,

    /// Wallet RPC endpoint (overrides config)
    #[arg(short, long, global = true)]
    wallet: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive wizard - connect and post a bounty (default)
    #[command(visible_alias = "w")]
    Wizard,

    /// Show the current bounty count
    #[command(visible_alias = "c")]
    Count,

    /// Connect the wallet and show the account
    Connect,

    /// Approve the payment token and post a bounty
    #[command(visible_alias = "p")]
    Post {
        /// Amount in token units (e.g. 2.5)
        #[arg(short, long)]
        amount: Option<String>,

        /// Question identifier
        #[arg(short, long)]
        question: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Open the bounty transaction in the block explorer
        #[arg(long)]
        open: bool,
    },

    /// Print the calldata that would be sent, without sending anything
    #[command(visible_alias = "e")]
    Encode {
        /// Amount in token units
        #[arg(short, long)]
        amount: String,

        /// Question identifier
        #[arg(short, long)]
        question: String,

        /// Also print the old fixed-slot postBounty layout
        #[arg(long)]
        legacy: bool,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose || std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    if let Err(e) = run(cli).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_from(&cli.config)?;
    if let Some(rpc) = cli.rpc {
        config.network.rpc_url = rpc;
    }
    if let Some(wallet) = cli.wallet {
        config.wallet.rpc_url = wallet;
    }

    // Default to wizard if no command specified
    let command = cli.command.unwrap_or(Commands::Wizard);

    match command {
        Commands::Wizard => wizard::run_post_wizard(app::App::build(config)).await,
        Commands::Count => commands::count::run(&app::App::build(config)).await,
        Commands::Connect => commands::connect::run(&app::App::build(config)).await,
        Commands::Post {
            amount,
            question,
            yes,
            open,
        } => {
            let app = app::App::build(config);
            commands::post::run(&app, amount, question, yes, open).await
        }
        Commands::Encode {
            amount,
            question,
            legacy,
        } => commands::encode::run(&config, &amount, &question, legacy),
        Commands::Config => commands::config::run(&config),
    }
}

pub fn print_banner() {
    println!("{}", style_cyan(BANNER));
    println!(
        "  {} {}",
        style_dim("Base Bounty Q&A"),
        style_dim(&format!("v{}", VERSION))
    );
    println!();
}
