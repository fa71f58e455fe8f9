use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;

use super::crypto::{KeyPair, PublicKey};
use super::keystore::{KeyStore, KeyStoreError};
use super::network::NetworkConfig;
use super::request::{FunctionCallRequest, ViewRequest};
use super::rpc::{AccessKeyInfoView, FinalExecutionOutcome, JsonRpcClient, RpcError};
use super::transaction::{
    AccessKey, AccessKeyPermission, Action, AddKeyAction, DeleteKeyAction,
    FunctionCallPermission, Transaction,
};
use super::units::Deposit;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("no key for account {account_id} on {network_id}; add it to the credential store or pass --key")]
    MissingKey {
        network_id: String,
        account_id: String,
    },
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("could not encode call arguments: {0}")]
    Args(#[from] serde_json::Error),
    #[error("could not sign transaction: {0}")]
    Signing(#[from] std::io::Error),
}

/// Connection to one network: profile, RPC client and key-store.
#[derive(Debug, Clone)]
pub struct Near {
    config: NetworkConfig,
    rpc: JsonRpcClient,
    key_store: Arc<dyn KeyStore>,
}

impl Near {
    pub fn connect(config: NetworkConfig, key_store: Arc<dyn KeyStore>) -> Result<Self, AccountError> {
        let rpc = JsonRpcClient::new(&config.node_url)?;
        debug!("connected to {} via {}", config.network_id, config.node_url);
        Ok(Self {
            config,
            rpc,
            key_store,
        })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn rpc(&self) -> &JsonRpcClient {
        &self.rpc
    }

    pub fn key_store(&self) -> &Arc<dyn KeyStore> {
        &self.key_store
    }

    /// Account handle whose key pair comes from the key-store.
    pub fn account(&self, account_id: &str) -> Result<Account, AccountError> {
        let network_id = self.config.network_id.as_str();
        let key_pair = self
            .key_store
            .get_key(network_id, account_id)?
            .ok_or_else(|| AccountError::MissingKey {
                network_id: network_id.to_string(),
                account_id: account_id.to_string(),
            })?;
        Ok(self.account_with_key(account_id, key_pair))
    }

    pub fn account_with_key(&self, account_id: &str, key_pair: KeyPair) -> Account {
        Account {
            account_id: account_id.to_string(),
            key_pair,
            rpc: self.rpc.clone(),
            config: self.config.clone(),
        }
    }
}

/// A signer bound to one account id and one key pair.
#[derive(Debug, Clone)]
pub struct Account {
    account_id: String,
    key_pair: KeyPair,
    rpc: JsonRpcClient,
    config: NetworkConfig,
}

impl Account {
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn public_key(&self) -> PublicKey {
        self.key_pair.public_key()
    }

    /// Signs `actions` with the next nonce of the signing key and waits for
    /// the transaction to finish. Nothing is retried.
    pub async fn sign_and_send(
        &self,
        receiver_id: &str,
        actions: Vec<Action>,
    ) -> Result<FinalExecutionOutcome, AccountError> {
        let public_key = self.key_pair.public_key();
        let access_key = self
            .rpc
            .view_access_key(&self.account_id, &public_key)
            .await?;

        let transaction = Transaction {
            signer_id: self.account_id.clone(),
            public_key,
            nonce: access_key.nonce + 1,
            receiver_id: receiver_id.to_string(),
            block_hash: access_key.block_hash,
            actions,
        };
        let signed = transaction.sign(&self.key_pair)?;
        debug!(
            "broadcasting {} with nonce {}",
            signed.hash(),
            signed.transaction.nonce
        );

        let outcome = self.rpc.broadcast_tx_commit(&signed).await?;
        for line in outcome.logs() {
            info!("{receiver_id}: {line}");
        }
        info!(
            "transaction {}",
            self.config.explorer_transaction_url(outcome.transaction_hash())
        );
        Ok(outcome)
    }

    /// Runs one function call and returns its decoded return value.
    pub async fn function_call(
        &self,
        request: &FunctionCallRequest,
    ) -> Result<Option<Value>, AccountError> {
        info!(
            "{} -> {}.{} (gas {}, deposit {})",
            self.account_id,
            request.contract_id,
            request.method_name,
            request.gas,
            request.attached_deposit
        );
        let action = request.to_action()?;
        let outcome = self
            .sign_and_send(&request.contract_id, vec![action])
            .await?;
        Ok(outcome.into_result()?)
    }

    pub async fn view_function(&self, request: &ViewRequest) -> Result<Value, AccountError> {
        Ok(self.rpc.call_function(request).await?)
    }

    pub async fn get_access_keys(&self) -> Result<Vec<AccessKeyInfoView>, AccountError> {
        Ok(self.rpc.view_access_key_list(&self.account_id).await?)
    }

    pub async fn add_full_access_key(
        &self,
        public_key: PublicKey,
    ) -> Result<FinalExecutionOutcome, AccountError> {
        self.add_key(public_key, AccessKeyPermission::FullAccess).await
    }

    /// Adds a key that may only call `contract_id`, spending at most `allowance` on gas.
    pub async fn add_function_call_key(
        &self,
        public_key: PublicKey,
        contract_id: &str,
        method_names: Vec<String>,
        allowance: Option<Deposit>,
    ) -> Result<FinalExecutionOutcome, AccountError> {
        let permission = AccessKeyPermission::FunctionCall(FunctionCallPermission {
            allowance: allowance.map(|a| a.as_yocto()),
            receiver_id: contract_id.to_string(),
            method_names,
        });
        self.add_key(public_key, permission).await
    }

    async fn add_key(
        &self,
        public_key: PublicKey,
        permission: AccessKeyPermission,
    ) -> Result<FinalExecutionOutcome, AccountError> {
        let action = Action::AddKey(AddKeyAction {
            public_key,
            access_key: AccessKey {
                nonce: 0,
                permission,
            },
        });
        let outcome = self.sign_and_send(&self.account_id, vec![action]).await?;
        outcome.clone().into_result()?;
        Ok(outcome)
    }

    pub async fn delete_key(
        &self,
        public_key: PublicKey,
    ) -> Result<FinalExecutionOutcome, AccountError> {
        let action = Action::DeleteKey(DeleteKeyAction { public_key });
        let outcome = self.sign_and_send(&self.account_id, vec![action]).await?;
        outcome.clone().into_result()?;
        Ok(outcome)
    }
}
