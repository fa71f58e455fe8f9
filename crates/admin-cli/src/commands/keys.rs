use clap::Subcommand;
use eyre::{Context, Result};
use serde_json::json;
use shared::near::{Deposit, PublicKey};
use shared::staking::constants::FUNCTION_KEY_ALLOWANCE;
use shared::staking::provisioning::ensure_function_key;

use super::common::{connect, print_json, signer_account, target_account, SignerArgs};
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub(crate) enum KeysCommands {
    /// List access keys of an account
    List {
        /// Defaults to the signer account
        #[arg(long)]
        account_id: Option<String>,
    },
    /// Add a function-call key for a contract unless one exists
    EnsureFunctionKey {
        /// Receiver of the key (defaults to the staking contract)
        #[arg(long)]
        contract: Option<String>,

        /// Gas allowance in NEAR
        #[arg(long)]
        allowance: Option<String>,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Delete an access key from the signer account
    Delete {
        #[arg(long)]
        public_key: PublicKey,

        #[command(flatten)]
        signer: SignerArgs,
    },
}

pub(crate) async fn handle_command(command: KeysCommands, config: &Config) -> Result<()> {
    match command {
        KeysCommands::List { account_id } => {
            let account_id = target_account(account_id, config)?;
            if config.dry_run {
                return print_json(&json!({
                    "request_type": "view_access_key_list",
                    "account_id": account_id,
                }));
            }
            let near = connect(config)?;
            let keys = near
                .rpc()
                .view_access_key_list(&account_id)
                .await
                .with_context(|| format!("Failed to list keys of {account_id}"))?;
            print_json(&keys)
        }
        KeysCommands::EnsureFunctionKey {
            contract,
            allowance,
            signer,
        } => {
            let contract = contract.unwrap_or_else(|| config.contracts.staking.clone());
            let allowance = match allowance {
                Some(near) => Deposit::from_near(&near)?,
                None => FUNCTION_KEY_ALLOWANCE,
            };
            if config.dry_run {
                return print_json(&json!({
                    "receiver_id": contract,
                    "allowance": allowance,
                }));
            }
            let near = connect(config)?;
            let account = signer_account(&near, &signer, config)?;
            let added = ensure_function_key(
                &account,
                near.key_store().as_ref(),
                near.config().network_id.as_str(),
                &contract,
                allowance,
            )
            .await?;
            match added {
                Some(public_key) => println!("Added access key {public_key} for {contract}"),
                None => println!("Access key for {contract} already present"),
            }
            Ok(())
        }
        KeysCommands::Delete { public_key, signer } => {
            if config.dry_run {
                return print_json(&json!({ "delete_key": public_key }));
            }
            let near = connect(config)?;
            let account = signer_account(&near, &signer, config)?;
            let outcome = account.delete_key(public_key).await?;
            println!("Deleted {public_key} in {}", outcome.transaction_hash());
            Ok(())
        }
    }
}
