use clap::Subcommand;
use eyre::Result;

use super::common::{connect, run_view, send_call, send_with, signer_account, SignerArgs};
use crate::config::Config;

#[derive(Subcommand, Debug)]
pub(crate) enum AdminCommands {
    /// Grant admin rights on the staking contract
    Add {
        /// Account to promote
        account_id: String,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Revoke admin rights, one transaction per account
    Remove {
        /// Accounts to demote
        #[arg(required = true)]
        account_ids: Vec<String>,

        #[command(flatten)]
        signer: SignerArgs,
    },
    /// Show the current admin list
    List,
}

pub(crate) async fn handle_command(command: AdminCommands, config: &Config) -> Result<()> {
    let staking = config.contracts.staking_contract();
    match command {
        AdminCommands::Add { account_id, signer } => {
            let request = staking.build_add_admin(&account_id);
            send_call(&request, &signer, config, "Add Admin").await
        }
        AdminCommands::Remove {
            account_ids,
            signer,
        } => {
            let requests: Vec<_> = account_ids
                .iter()
                .map(|account_id| staking.build_remove_admin(account_id))
                .collect();
            if config.dry_run {
                for request in &requests {
                    send_call(request, &signer, config, "Remove Admin").await?;
                }
                return Ok(());
            }
            let near = connect(config)?;
            let account = signer_account(&near, &signer, config)?;
            for request in &requests {
                send_with(&account, request, "Remove Admin").await?;
            }
            Ok(())
        }
        AdminCommands::List => run_view(&staking.view_admin_list(), config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{TestNode, SIGNER};

    #[tokio::test]
    async fn test_remove_sends_one_call_per_account_with_one_signer() {
        let mut node = TestNode::start().await;
        let staking = node.config().contracts.staking;
        let nonce_lookups = node.mock_access_key(2).await;
        let first = node
            .mock_call(&staking, "remove_admin", r#""account_id":"halyconstudio.testnet""#)
            .await;
        let second = node
            .mock_call(&staking, "remove_admin", r#""account_id":"cj.testnet""#)
            .await;

        let command = AdminCommands::Remove {
            account_ids: vec!["halyconstudio.testnet".to_string(), "cj.testnet".to_string()],
            signer: SignerArgs {
                account: Some(SIGNER.to_string()),
                key: None,
            },
        };
        handle_command(command, &node.config()).await.unwrap();

        nonce_lookups.assert_async().await;
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove_stops_at_the_first_failure() {
        let mut node = TestNode::start().await;
        let staking = node.config().contracts.staking;
        let _nonce_lookups = node.mock_access_key(1).await;
        let first = node
            .mock_call(&staking, "remove_admin", r#""account_id":"halyconstudio.testnet""#)
            .await;

        let command = AdminCommands::Remove {
            account_ids: vec!["halyconstudio.testnet".to_string(), "unknown.testnet".to_string()],
            signer: SignerArgs::default(),
        };
        assert!(handle_command(command, &node.config()).await.is_err());
        first.assert_async().await;
    }
}
