use clap::Args;
use eyre::{Context, Result};
use log::info;
use serde::Serialize;
use shared::near::{Account, FunctionCallRequest, Near, ViewRequest};
use std::sync::Arc;

use crate::config::Config;
use crate::secure_key::KeySource;

/// Signer selection shared by every command that sends a transaction.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct SignerArgs {
    /// Signing account (defaults to NEAR_SIGNER_ACCOUNT)
    #[arg(short = 'a', long = "account")]
    pub(crate) account: Option<String>,

    /// Secret key source (env:VAR_NAME, file:/path or prompt); credential store when omitted
    #[arg(short = 'k', long)]
    pub(crate) key: Option<String>,
}

pub(crate) fn connect(config: &Config) -> Result<Near> {
    let network = config.network_config()?;
    let key_store = config.key_store()?;
    Near::connect(network, Arc::new(key_store)).context("Failed to connect to the RPC node")
}

pub(crate) fn signer_account(near: &Near, signer: &SignerArgs, config: &Config) -> Result<Account> {
    let account_id = config.get_signer(signer.account.clone())?;
    match KeySource::from_arg(signer.key.clone()).resolve()? {
        Some(key_pair) => Ok(near.account_with_key(&account_id, key_pair)),
        None => near
            .account(&account_id)
            .with_context(|| format!("Failed to load account {account_id}")),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Sends one function call and prints `done` once it has executed.
///
/// With `dry_run` the request payload is printed and nothing is signed.
pub(crate) async fn send_call(
    request: &FunctionCallRequest,
    signer: &SignerArgs,
    config: &Config,
    done: &str,
) -> Result<()> {
    if config.dry_run {
        return print_json(request);
    }
    let near = connect(config)?;
    let account = signer_account(&near, signer, config)?;
    send_with(&account, request, done).await
}

pub(crate) async fn send_with(account: &Account, request: &FunctionCallRequest, done: &str) -> Result<()> {
    let result = account
        .function_call(request)
        .await
        .with_context(|| format!("{}.{} failed", request.contract_id, request.method_name))?;
    println!("{done}");
    if let Some(value) = result {
        print_json(&value)?;
    }
    Ok(())
}

/// Runs a view call and prints its JSON result.
pub(crate) async fn run_view(request: &ViewRequest, config: &Config) -> Result<()> {
    if config.dry_run {
        return print_json(request);
    }
    let near = connect(config)?;
    info!("view {}.{}", request.contract_id, request.method_name);
    let value = near
        .rpc()
        .call_function(request)
        .await
        .with_context(|| format!("{}.{} failed", request.contract_id, request.method_name))?;
    print_json(&value)
}

/// Account whose balance or shares a view should read: explicit, then the signer.
pub(crate) fn target_account(account_id: Option<String>, config: &Config) -> Result<String> {
    config.get_signer(account_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::dry_run_config;
    use shared::staking::ContractIds;

    #[tokio::test]
    async fn test_dry_run_sends_nothing() {
        let request = ContractIds::default()
            .staking_contract()
            .build_remove_admin("dekatjauh.testnet");
        send_call(&request, &SignerArgs::default(), &dry_run_config(), "Remove Admin")
            .await
            .unwrap();

        let view = ContractIds::default().staking_contract().view_admin_list();
        run_view(&view, &dry_run_config()).await.unwrap();
    }

    #[test]
    fn test_explicit_key_skips_the_credential_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Config {
            signer: Some("xuguangxia.testnet".to_string()),
            credentials_dir: Some(temp_dir.path().to_path_buf()),
            ..Config::default()
        };
        let near = connect(&config).unwrap();

        let from_store = signer_account(&near, &SignerArgs::default(), &config);
        assert!(from_store.is_err());

        let key_file = temp_dir.path().join("key");
        let key_pair = shared::near::KeyPair::from_seed([50u8; 32]);
        std::fs::write(&key_file, key_pair.secret_key_string()).unwrap();
        let signer = SignerArgs {
            account: None,
            key: Some(format!("file:{}", key_file.display())),
        };
        let account = signer_account(&near, &signer, &config).unwrap();
        assert_eq!(account.account_id(), "xuguangxia.testnet");
        assert_eq!(account.public_key(), key_pair.public_key());
    }
}
