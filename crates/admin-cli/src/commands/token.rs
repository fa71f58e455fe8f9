use clap::Subcommand;
use eyre::{Context, Result};
use shared::staking::provisioning::wrap_register;

use super::common::{connect, print_json, run_view, send_call, signer_account, target_account, SignerArgs};
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub(crate) enum TokenCommands {
    /// Pay storage for an account on the Ref exchange
    RegisterStorage {
        /// Account to register (defaults to the staking contract)
        #[arg(long)]
        account_id: Option<String>,

        #[arg(long)]
        registration_only: bool,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Register an account for the LP shares of a pool
    MftRegister {
        #[arg(short = 'p', long, default_value = "382")]
        pool_id: u64,

        /// Account to register (defaults to the staking contract)
        #[arg(long)]
        account_id: Option<String>,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Show a fungible token balance
    Balance {
        /// Defaults to the signer account
        #[arg(long)]
        account_id: Option<String>,

        /// Token contract (defaults to the configured token contract)
        #[arg(long)]
        contract: Option<String>,
    },
    /// Transfer fungible tokens
    Transfer {
        #[arg(short = 'r', long)]
        receiver_id: String,

        #[arg(short = 'm', long)]
        amount: u128,

        /// Memo passed as `msg`
        #[arg(long)]
        msg: Option<String>,

        /// Token contract (defaults to the configured token contract)
        #[arg(long)]
        contract: Option<String>,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Register the signer on the wrap contract, paying its storage minimum
    WrapRegister {
        #[command(flatten)]
        signer: SignerArgs,
    },
}

pub(crate) async fn handle_command(command: TokenCommands, config: &Config) -> Result<()> {
    let contracts = &config.contracts;
    match command {
        TokenCommands::RegisterStorage {
            account_id,
            registration_only,
            signer,
        } => {
            let account_id = account_id.unwrap_or_else(|| contracts.staking.clone());
            let request = contracts
                .ref_exchange()
                .build_storage_deposit(&account_id, registration_only);
            send_call(&request, &signer, config, "register token").await
        }
        TokenCommands::MftRegister {
            pool_id,
            account_id,
            signer,
        } => {
            let account_id = account_id.unwrap_or_else(|| contracts.staking.clone());
            let request = contracts.ref_exchange().build_mft_register(pool_id, &account_id);
            send_call(&request, &signer, config, "register contract").await
        }
        TokenCommands::Balance {
            account_id,
            contract,
        } => {
            let token = super::token_contract(contract, config)?;
            let account_id = target_account(account_id, config)?;
            run_view(&token.view_balance_of(&account_id), config).await
        }
        TokenCommands::Transfer {
            receiver_id,
            amount,
            msg,
            contract,
            signer,
        } => {
            let token = super::token_contract(contract, config)?;
            let request = token.build_ft_transfer(&receiver_id, amount, msg.as_deref());
            send_call(&request, &signer, config, "transferred").await
        }
        TokenCommands::WrapRegister { signer } => {
            let wrap = contracts.wrap_token();
            if config.dry_run {
                let account_id = config.get_signer(signer.account.clone())?;
                return print_json(&wrap.view_storage_minimum_balance(&account_id));
            }
            let near = connect(config)?;
            let account = signer_account(&near, &signer, config)?;
            let result = wrap_register(&account, &wrap)
                .await
                .context("Wrap registration failed")?;
            println!("registered");
            if let Some(value) = result {
                print_json(&value)?;
            }
            Ok(())
        }
    }
}
