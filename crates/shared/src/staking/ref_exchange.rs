use serde_json::json;

use super::constants::{MAX_GAS, MFT_REGISTER_DEPOSIT, REF_STORAGE_DEPOSIT, SIMPLE_POOL_DEPOSIT};
use super::staking_contract::StakingMsg;
use crate::near::{Deposit, FunctionCallRequest, ViewRequest};

/// Multi-fungible-token id of the LP shares of a Ref pool, e.g. `:382`.
pub fn pool_token_id(pool_id: u64) -> String {
    format!(":{pool_id}")
}

/// Call builders for the Ref exchange.
#[derive(Debug, Clone)]
pub struct RefExchange {
    contract_id: String,
}

impl RefExchange {
    pub fn new(contract_id: &str) -> Self {
        Self {
            contract_id: contract_id.to_string(),
        }
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    fn call(&self, method_name: &str) -> FunctionCallRequest {
        FunctionCallRequest::new(&self.contract_id, method_name).with_gas(MAX_GAS)
    }

    pub fn build_storage_deposit(
        &self,
        account_id: &str,
        registration_only: bool,
    ) -> FunctionCallRequest {
        self.call("storage_deposit")
            .with_args(json!({
                "account_id": account_id,
                "registration_only": registration_only,
            }))
            .with_deposit(REF_STORAGE_DEPOSIT)
    }

    /// Registers `account_id` as a holder of the LP shares of `pool_id`.
    pub fn build_mft_register(&self, pool_id: u64, account_id: &str) -> FunctionCallRequest {
        self.call("mft_register")
            .with_args(json!({
                "token_id": pool_token_id(pool_id),
                "account_id": account_id,
            }))
            .with_deposit(MFT_REGISTER_DEPOSIT)
    }

    pub fn build_add_simple_pool(&self, tokens: &[String], fee: u32) -> FunctionCallRequest {
        self.call("add_simple_pool")
            .with_args(json!({ "tokens": tokens, "fee": fee }))
            .with_deposit(SIMPLE_POOL_DEPOSIT)
    }

    pub fn build_mft_transfer(
        &self,
        pool_id: u64,
        receiver_id: &str,
        amount: u128,
    ) -> FunctionCallRequest {
        self.call("mft_transfer")
            .with_args(json!({
                "token_id": pool_token_id(pool_id),
                "receiver_id": receiver_id,
                "amount": amount.to_string(),
            }))
            .with_deposit(Deposit::ONE_YOCTO)
    }

    pub fn build_remove_liquidity(
        &self,
        pool_id: u64,
        shares: u128,
        min_amounts: &[u128],
    ) -> FunctionCallRequest {
        let min_amounts: Vec<String> = min_amounts.iter().map(u128::to_string).collect();
        self.call("remove_liquidity")
            .with_args(json!({
                "pool_id": pool_id,
                "shares": shares.to_string(),
                "min_amounts": min_amounts,
            }))
            .with_deposit(Deposit::ONE_YOCTO)
    }

    /// Stakes LP shares by transferring them to `staking_contract_id` with a staking `msg`.
    pub fn build_stake_lp(
        &self,
        pool_id: u64,
        staking_contract_id: &str,
        amount: u128,
        msg: &StakingMsg,
    ) -> Result<FunctionCallRequest, serde_json::Error> {
        Ok(self
            .call("mft_transfer_call")
            .with_args(json!({
                "token_id": pool_token_id(pool_id),
                "receiver_id": staking_contract_id,
                "amount": amount.to_string(),
                "msg": msg.to_msg_string()?,
            }))
            .with_deposit(Deposit::ONE_YOCTO))
    }

    pub fn view_pool_shares(&self, pool_id: u64, account_id: &str) -> ViewRequest {
        ViewRequest::new(&self.contract_id, "get_pool_shares")
            .with_args(json!({ "pool_id": pool_id, "account_id": account_id }))
    }
}
