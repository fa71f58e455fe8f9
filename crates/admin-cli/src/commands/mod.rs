use crate::config::Config;
use eyre::Result;
use shared::staking::FungibleToken;

pub(crate) mod admin;
pub(crate) mod common;
pub(crate) mod farm;
pub(crate) mod keys;
pub(crate) mod liquidity;
pub(crate) mod network;
pub(crate) mod raw;
pub(crate) mod stake;
pub(crate) mod token;

#[cfg(test)]
mod testing;

pub(crate) use admin::AdminCommands;
pub(crate) use farm::FarmCommands;
pub(crate) use keys::KeysCommands;
pub(crate) use liquidity::LiquidityCommands;
pub(crate) use raw::{CallArgs, ViewArgs};
pub(crate) use stake::StakeCommands;
pub(crate) use token::TokenCommands;

pub(crate) async fn handle_admin_command(command: AdminCommands, config: &Config) -> Result<()> {
    admin::handle_command(command, config).await
}

pub(crate) async fn handle_farm_command(command: FarmCommands, config: &Config) -> Result<()> {
    farm::handle_command(command, config).await
}

pub(crate) async fn handle_token_command(command: TokenCommands, config: &Config) -> Result<()> {
    token::handle_command(command, config).await
}

pub(crate) async fn handle_liquidity_command(
    command: LiquidityCommands,
    config: &Config,
) -> Result<()> {
    liquidity::handle_command(command, config).await
}

pub(crate) async fn handle_stake_command(command: StakeCommands, config: &Config) -> Result<()> {
    stake::handle_command(command, config).await
}

pub(crate) async fn handle_keys_command(command: KeysCommands, config: &Config) -> Result<()> {
    keys::handle_command(command, config).await
}

/// The explicitly named token contract, else the configured one.
fn token_contract(contract: Option<String>, config: &Config) -> Result<FungibleToken> {
    match contract {
        Some(contract) => Ok(FungibleToken::new(&contract)),
        None => Ok(config.contracts.token()?),
    }
}
