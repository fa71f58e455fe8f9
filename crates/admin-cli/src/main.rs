use clap::{Parser, Subcommand};
use eyre::Result;
use log::LevelFilter;
use std::path::PathBuf;

mod commands;
mod config;
mod secure_key;

use commands::*;
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "staking-admin")]
#[command(about = "Operator CLI for the NEAR staking contract, Ref exchange and tokens")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Network profile, testnet or mainnet (overrides NEAR_ENV)
    #[arg(long, global = true)]
    network: Option<String>,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<String>,

    /// Environment file path
    #[arg(long, global = true, default_value = ".env")]
    env_file: String,

    /// RPC node URL (overrides the network profile)
    #[arg(long, global = true)]
    node_url: Option<String>,

    /// Credential store root (defaults to ~/.near-credentials)
    #[arg(long, global = true)]
    credentials_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Print request payloads instead of sending them
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Staking contract admin list
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Farms, rewards and unstaking
    Farm {
        #[command(subcommand)]
        command: FarmCommands,
    },
    /// Token registration, balances and transfers
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
    /// Ref exchange pools and LP shares
    Liquidity {
        #[command(subcommand)]
        command: LiquidityCommands,
    },
    /// Stake tokens or LP shares
    Stake {
        #[command(subcommand)]
        command: StakeCommands,
    },
    /// Access keys of the signer account
    Keys {
        #[command(subcommand)]
        command: KeysCommands,
    },
    /// Send an arbitrary function call
    Call(CallArgs),
    /// Run an arbitrary view call
    View(ViewArgs),
    /// Show the resolved network profile
    Network,
}

fn init_logging(level: &str) -> Result<()> {
    let log_level = match level {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => eyre::bail!("invalid log level: {level}"),
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .filter_module("reqwest", LevelFilter::Warn)
        .format_timestamp(None)
        .init();
    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(&cli.config, &cli.env_file)?;
    if let Some(network) = &cli.network {
        config = config.with_network(network.clone());
    }
    if let Some(node_url) = &cli.node_url {
        config = config.with_node_url(node_url.clone());
    }
    if let Some(dir) = &cli.credentials_dir {
        config = config.with_credentials_dir(dir.clone());
    }
    Ok(config.with_dry_run(cli.dry_run))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let config = build_config(&cli)?;

    match cli.command {
        Commands::Admin { command } => handle_admin_command(command, &config).await,
        Commands::Farm { command } => handle_farm_command(command, &config).await,
        Commands::Token { command } => handle_token_command(command, &config).await,
        Commands::Liquidity { command } => handle_liquidity_command(command, &config).await,
        Commands::Stake { command } => handle_stake_command(command, &config).await,
        Commands::Keys { command } => handle_keys_command(command, &config).await,
        Commands::Call(call) => raw::handle_call(call, &config).await,
        Commands::View(view) => raw::handle_view(view, &config).await,
        Commands::Network => network::handle_command(&config),
    }
}
