use log::info;
use serde_json::Value;

use super::fungible_token::FungibleToken;
use super::RecipeError;
use crate::near::rpc::{AccessKeyInfoView, AccessKeyPermissionView};
use crate::near::{Account, Deposit, KeyPair, KeyStore, PublicKey};

/// Whether any key in `keys` is a function-call key for `contract_id`.
pub fn has_function_key_for(keys: &[AccessKeyInfoView], contract_id: &str) -> bool {
    keys.iter().any(|key| {
        matches!(
            &key.access_key.permission,
            AccessKeyPermissionView::FunctionCall { receiver_id, .. } if receiver_id == contract_id
        )
    })
}

/// Adds a function-call key for `contract_id` unless the account already has one.
///
/// The new key pair is stored under its own public key before it is added on
/// chain. Returns the public key when a key was added.
pub async fn ensure_function_key(
    account: &Account,
    key_store: &dyn KeyStore,
    network_id: &str,
    contract_id: &str,
    allowance: Deposit,
) -> Result<Option<PublicKey>, RecipeError> {
    let keys = account.get_access_keys().await?;
    if has_function_key_for(&keys, contract_id) {
        info!("{} already has a key for {contract_id}", account.account_id());
        return Ok(None);
    }

    info!("Adding AccessKey to {contract_id}");
    let key_pair = KeyPair::from_random();
    let public_key = key_pair.public_key();
    key_store.set_key(network_id, &public_key.to_string(), &key_pair)?;
    account
        .add_function_call_key(public_key, contract_id, Vec::new(), Some(allowance))
        .await?;
    Ok(Some(public_key))
}

/// Registers the account on the wrap contract, paying its storage minimum.
pub async fn wrap_register(
    account: &Account,
    wrap: &FungibleToken,
) -> Result<Option<Value>, RecipeError> {
    let view = wrap.view_storage_minimum_balance(account.account_id());
    let minimum = account.view_function(&view).await?;
    let deposit = parse_deposit(&minimum).ok_or_else(|| RecipeError::UnexpectedView {
        method: view.method_name.clone(),
        value: minimum.clone(),
    })?;

    let request = wrap.build_storage_deposit(account.account_id(), deposit);
    Ok(account.function_call(&request).await?)
}

fn parse_deposit(value: &Value) -> Option<Deposit> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64().map(|n| Deposit(n.into())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::near::keystore::InMemoryKeyStore;
    use crate::near::rpc::AccessKeyEntry;
    use crate::near::transaction::CryptoHash;
    use crate::near::{NetworkConfig, Near};
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;
    use std::sync::Arc;

    const SIGNER: &str = "uon_staking_test_01.supernova11.testnet";
    const STAKING: &str = "uon_staking_test_09.xuguangxia.testnet";

    fn function_key(receiver_id: &str) -> AccessKeyInfoView {
        AccessKeyInfoView {
            public_key: KeyPair::from_seed([1u8; 32]).public_key(),
            access_key: AccessKeyEntry {
                nonce: 0,
                permission: AccessKeyPermissionView::FunctionCall {
                    allowance: None,
                    receiver_id: receiver_id.to_string(),
                    method_names: vec![],
                },
            },
        }
    }

    fn full_key() -> AccessKeyInfoView {
        AccessKeyInfoView {
            public_key: KeyPair::from_seed([2u8; 32]).public_key(),
            access_key: AccessKeyEntry {
                nonce: 3,
                permission: AccessKeyPermissionView::FullAccess,
            },
        }
    }

    fn result_body(result: Value) -> String {
        json!({ "jsonrpc": "2.0", "id": "dontcare", "result": result }).to_string()
    }

    fn account(server: &ServerGuard) -> Account {
        let store = InMemoryKeyStore::with_key("testnet", SIGNER, KeyPair::from_seed([30u8; 32]));
        let config = NetworkConfig::testnet().with_node_url(server.url());
        Near::connect(config, Arc::new(store))
            .unwrap()
            .account(SIGNER)
            .unwrap()
    }

    async fn mock_key_list(server: &mut ServerGuard, keys: &[AccessKeyInfoView]) {
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "params": { "request_type": "view_access_key_list" }
            })))
            .with_status(200)
            .with_body(result_body(json!({
                "keys": keys,
                "block_height": 1,
                "block_hash": CryptoHash::default().to_string(),
            })))
            .create_async()
            .await;
    }

    async fn mock_nonce(server: &mut ServerGuard) {
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "params": { "request_type": "view_access_key" }
            })))
            .with_status(200)
            .with_body(result_body(json!({
                "nonce": 1,
                "permission": "FullAccess",
                "block_hash": CryptoHash([4u8; 32]).to_string(),
            })))
            .create_async()
            .await;
    }

    #[test]
    fn test_has_function_key_for() {
        let keys = vec![full_key(), function_key("wrap.testnet")];
        assert!(has_function_key_for(&keys, "wrap.testnet"));
        assert!(!has_function_key_for(&keys, STAKING));
        assert!(!has_function_key_for(&[full_key()], "wrap.testnet"));
    }

    #[test]
    fn test_parse_deposit() {
        assert_eq!(parse_deposit(&json!("1250000000000000000000")), Some(Deposit(1_250_000_000_000_000_000_000)));
        assert_eq!(parse_deposit(&json!(10)), Some(Deposit(10)));
        assert_eq!(parse_deposit(&json!({ "min": "1" })), None);
    }

    #[tokio::test]
    async fn test_existing_function_key_is_left_alone() {
        let mut server = Server::new_async().await;
        mock_key_list(&mut server, &[full_key(), function_key(STAKING)]).await;
        let broadcast = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": "broadcast_tx_commit" })))
            .expect(0)
            .create_async()
            .await;

        let store = InMemoryKeyStore::new();
        let added = ensure_function_key(&account(&server), &store, "testnet", STAKING, Deposit(1))
            .await
            .unwrap();
        assert_eq!(added, None);
        assert!(store.get_accounts("testnet").unwrap().is_empty());
        broadcast.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_function_key_is_generated_and_stored() {
        let mut server = Server::new_async().await;
        mock_key_list(&mut server, &[full_key()]).await;
        mock_nonce(&mut server).await;
        let broadcast = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": "broadcast_tx_commit" })))
            .with_status(200)
            .with_body(result_body(json!({
                "status": { "SuccessValue": "" },
                "transaction_outcome": { "id": "addKeyTx", "outcome": {} },
            })))
            .expect(1)
            .create_async()
            .await;

        let store = InMemoryKeyStore::new();
        let added = ensure_function_key(&account(&server), &store, "testnet", STAKING, Deposit(1))
            .await
            .unwrap()
            .expect("a key should have been added");

        let stored = store.get_key("testnet", &added.to_string()).unwrap().unwrap();
        assert_eq!(stored.public_key(), added);
        broadcast.assert_async().await;
    }

    #[tokio::test]
    async fn test_wrap_register_pays_storage_minimum() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "params": { "request_type": "call_function", "method_name": "storage_minimum_balance" }
            })))
            .with_status(200)
            .with_body(result_body(json!({
                "result": b"\"1250000000000000000000\"".to_vec(),
                "logs": [],
                "block_height": 1,
                "block_hash": CryptoHash::default().to_string(),
            })))
            .create_async()
            .await;
        mock_nonce(&mut server).await;
        let broadcast = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": "broadcast_tx_commit" })))
            .with_status(200)
            .with_body(result_body(json!({
                "status": { "SuccessValue": "" },
                "transaction_outcome": { "id": "wrapTx", "outcome": {} },
            })))
            .expect(1)
            .create_async()
            .await;

        let result = wrap_register(&account(&server), &FungibleToken::new("wrap.testnet"))
            .await
            .unwrap();
        assert_eq!(result, None);
        broadcast.assert_async().await;
    }
}
