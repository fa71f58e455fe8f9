use clap::Subcommand;
use eyre::Result;
use shared::staking::constants::DAY_MS;
use shared::staking::StakingMsg;

use super::common::{send_call, SignerArgs};
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub(crate) enum StakeCommands {
    /// Stake the configured token into a farm
    Token {
        #[arg(short = 'm', long)]
        amount: u128,

        #[arg(short = 'f', long, default_value = "0")]
        farm_id: u16,

        /// Lock duration in ms
        #[arg(long, default_value_t = DAY_MS)]
        lock_duration: u64,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Stake LP shares of a Ref pool into a farm
    Lp {
        #[arg(short = 'p', long)]
        pool_id: u64,

        #[arg(short = 'm', long)]
        amount: u128,

        #[arg(short = 'f', long, default_value = "0")]
        farm_id: u16,

        /// Lock duration in ms
        #[arg(long, default_value_t = DAY_MS)]
        lock_duration: u64,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Stake a token to the platform
    Platform {
        /// Token contract (defaults to the configured token contract)
        #[arg(long)]
        contract: Option<String>,

        #[arg(short = 'm', long)]
        amount: u128,

        #[command(flatten)]
        signer: SignerArgs,
    },
}

pub(crate) async fn handle_command(command: StakeCommands, config: &Config) -> Result<()> {
    let staking_id = config.contracts.staking.as_str();
    match command {
        StakeCommands::Token {
            amount,
            farm_id,
            lock_duration,
            signer,
        } => {
            let token = config.contracts.token()?;
            let msg = StakingMsg::farm(farm_id, lock_duration);
            let request = token.build_stake(staking_id, amount, &msg)?;
            send_call(&request, &signer, config, "Staking token").await
        }
        StakeCommands::Lp {
            pool_id,
            amount,
            farm_id,
            lock_duration,
            signer,
        } => {
            let msg = StakingMsg::farm(farm_id, lock_duration);
            let request = config
                .contracts
                .ref_exchange()
                .build_stake_lp(pool_id, staking_id, amount, &msg)?;
            send_call(&request, &signer, config, "Staking LP token").await
        }
        StakeCommands::Platform {
            contract,
            amount,
            signer,
        } => {
            let token = super::token_contract(contract, config)?;
            let request = token.build_stake(staking_id, amount, &StakingMsg::platform())?;
            send_call(&request, &signer, config, "Staking to platform").await
        }
    }
}
