use serde_json::json;

use super::constants::MAX_GAS;
use super::staking_contract::StakingMsg;
use crate::near::{Deposit, FunctionCallRequest, ViewRequest};

/// Call builders for an NEP-141 token, including `wrap.testnet`.
#[derive(Debug, Clone)]
pub struct FungibleToken {
    contract_id: String,
}

impl FungibleToken {
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

    pub fn build_ft_transfer(
        &self,
        receiver_id: &str,
        amount: u128,
        msg: Option<&str>,
    ) -> FunctionCallRequest {
        let mut args = json!({
            "receiver_id": receiver_id,
            "amount": amount.to_string(),
        });
        if let Some(msg) = msg {
            args["msg"] = json!(msg);
        }
        self.call("ft_transfer")
            .with_args(args)
            .with_deposit(Deposit::ONE_YOCTO)
    }

    /// Stakes tokens by transferring them to `staking_contract_id` with a staking `msg`.
    pub fn build_stake(
        &self,
        staking_contract_id: &str,
        amount: u128,
        msg: &StakingMsg,
    ) -> Result<FunctionCallRequest, serde_json::Error> {
        Ok(self
            .call("ft_transfer_call")
            .with_args(json!({
                "receiver_id": staking_contract_id,
                "amount": amount.to_string(),
                "msg": msg.to_msg_string()?,
            }))
            .with_deposit(Deposit::ONE_YOCTO))
    }

    pub fn build_storage_deposit(&self, receiver_id: &str, deposit: Deposit) -> FunctionCallRequest {
        self.call("storage_deposit")
            .with_args(json!({ "receiver_id": receiver_id }))
            .with_deposit(deposit)
    }

    pub fn view_balance_of(&self, account_id: &str) -> ViewRequest {
        ViewRequest::new(&self.contract_id, "ft_balance_of")
            .with_args(json!({ "account_id": account_id }))
    }

    pub fn view_storage_minimum_balance(&self, account_id: &str) -> ViewRequest {
        ViewRequest::new(&self.contract_id, "storage_minimum_balance")
            .with_args(json!({ "account_id": account_id }))
    }
}
