use clap::Subcommand;
use eyre::{Context, Result};
use shared::staking::constants::DAY_MS;
use shared::staking::{farm_window, FarmParams, SwapFarmParams};

use super::common::{run_view, send_call, target_account, SignerArgs};
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub(crate) enum FarmCommands {
    /// Add a token/LP reward farm
    Add {
        /// Staked token (defaults to the configured token contract)
        #[arg(long)]
        token_id: Option<String>,

        /// Ref pool whose LP shares can be staked
        #[arg(short = 'p', long)]
        pool_id: u64,

        /// Reward token (defaults to the staked token)
        #[arg(long)]
        reward_token_id: Option<String>,

        #[arg(long)]
        token_reward_rate: u128,

        #[arg(long)]
        pool_reward_rate: u128,

        /// Start in ms since the epoch (defaults to now)
        #[arg(long)]
        starting_at: Option<u64>,

        #[arg(long, default_value = "7")]
        duration_days: u64,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Create a swap farm or update its lock window
    SaveSwap {
        #[arg(long)]
        token_id: String,

        #[arg(long)]
        swap_rate: u128,

        #[arg(long, default_value = "24")]
        decimal: u32,

        /// Minimum lock in ms
        #[arg(long, default_value_t = DAY_MS)]
        min_lock_time: u64,

        /// Maximum lock in ms
        #[arg(long, default_value_t = 2 * DAY_MS)]
        max_lock_time: u64,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Show claimable rewards of an account
    ClaimAmount {
        /// Defaults to the signer account
        #[arg(long)]
        account_id: Option<String>,

        #[arg(short = 'f', long)]
        farm_id: Option<u16>,
    },
    /// Claim all pending rewards
    Claim {
        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Withdraw staked tokens
    Unstake {
        /// Token contract that was staked
        #[arg(long)]
        token_type: String,

        #[arg(short = 'm', long)]
        amount: u128,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Show one farm
    Info {
        #[arg(short = 'f', long)]
        farm_id: u16,
    },
}

pub(crate) async fn handle_command(command: FarmCommands, config: &Config) -> Result<()> {
    let staking = config.contracts.staking_contract();
    match command {
        FarmCommands::Add {
            token_id,
            pool_id,
            reward_token_id,
            token_reward_rate,
            pool_reward_rate,
            starting_at,
            duration_days,
            signer,
        } => {
            let token_id = match token_id {
                Some(token_id) => token_id,
                None => config.contracts.token()?.contract_id().to_string(),
            };
            let starting_at = match starting_at {
                Some(starting_at) => starting_at,
                None => now_ms()?,
            };
            let Some((starting_at, ending_at)) = farm_window(starting_at, duration_days) else {
                eyre::bail!("a {duration_days} day farm starting at {starting_at} ends past the representable time");
            };
            let params = FarmParams {
                reward_token_id: reward_token_id.unwrap_or_else(|| token_id.clone()),
                token_id,
                pool_id,
                token_reward_rate,
                pool_reward_rate,
                starting_at,
                ending_at,
            };
            send_call(&staking.build_add_farm(&params), &signer, config, "Add Farm").await
        }
        FarmCommands::SaveSwap {
            token_id,
            swap_rate,
            decimal,
            min_lock_time,
            max_lock_time,
            signer,
        } => {
            if min_lock_time > max_lock_time {
                eyre::bail!("min_lock_time ({min_lock_time}) exceeds max_lock_time ({max_lock_time})");
            }
            let params = SwapFarmParams {
                token_id,
                swap_rate,
                decimal,
                min_lock_time,
                max_lock_time,
            };
            send_call(&staking.build_save_swap_farm(&params), &signer, config, "Add Swap Farm").await
        }
        FarmCommands::ClaimAmount {
            account_id,
            farm_id,
        } => {
            let account_id = target_account(account_id, config)?;
            run_view(&staking.view_claim_amount(&account_id, farm_id), config).await
        }
        FarmCommands::Claim { signer } => {
            send_call(&staking.build_claim_reward(), &signer, config, "Claimed").await
        }
        FarmCommands::Unstake {
            token_type,
            amount,
            signer,
        } => {
            let request = staking.build_unstake(&token_type, amount);
            send_call(&request, &signer, config, "Unstaked").await
        }
        FarmCommands::Info { farm_id } => run_view(&staking.view_farm_info(farm_id), config).await,
    }
}

fn now_ms() -> Result<u64> {
    u64::try_from(chrono::Utc::now().timestamp_millis()).context("System clock is before 1970")
}
