use clap::Subcommand;
use eyre::Result;

use super::common::{run_view, send_call, target_account, SignerArgs};
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub(crate) enum LiquidityCommands {
    /// Show LP shares of an account in a pool
    Shares {
        #[arg(short = 'p', long, default_value = "382")]
        pool_id: u64,

        /// Defaults to the signer account
        #[arg(long)]
        account_id: Option<String>,
    },
    /// Transfer LP shares
    Transfer {
        #[arg(short = 'p', long, default_value = "382")]
        pool_id: u64,

        #[arg(short = 'r', long)]
        receiver_id: String,

        #[arg(short = 'm', long)]
        amount: u128,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Burn LP shares for the underlying tokens
    Remove {
        #[arg(short = 'p', long, default_value = "382")]
        pool_id: u64,

        #[arg(long)]
        shares: u128,

        /// Minimum amount of each pool token to receive
        #[arg(long, value_delimiter = ',', default_value = "0,0")]
        min_amounts: Vec<u128>,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Create a two-token simple pool
    CreatePool {
        /// Pool tokens, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        tokens: Vec<String>,

        /// Fee in basis points
        #[arg(long, default_value = "30")]
        fee: u32,

        #[command(flatten)]
        signer: SignerArgs,
    },
}

pub(crate) async fn handle_command(command: LiquidityCommands, config: &Config) -> Result<()> {
    let exchange = config.contracts.ref_exchange();
    match command {
        LiquidityCommands::Shares {
            pool_id,
            account_id,
        } => {
            let account_id = target_account(account_id, config)?;
            run_view(&exchange.view_pool_shares(pool_id, &account_id), config).await
        }
        LiquidityCommands::Transfer {
            pool_id,
            receiver_id,
            amount,
            signer,
        } => {
            let request = exchange.build_mft_transfer(pool_id, &receiver_id, amount);
            send_call(&request, &signer, config, "transferred").await
        }
        LiquidityCommands::Remove {
            pool_id,
            shares,
            min_amounts,
            signer,
        } => {
            let request = exchange.build_remove_liquidity(pool_id, shares, &min_amounts);
            send_call(&request, &signer, config, "liquidity removed").await
        }
        LiquidityCommands::CreatePool {
            tokens,
            fee,
            signer,
        } => {
            if tokens.len() < 2 {
                eyre::bail!("a pool needs at least two tokens, got {}", tokens.len());
            }
            let request = exchange.build_add_simple_pool(&tokens, fee);
            send_call(&request, &signer, config, "create pool contract").await
        }
    }
}
