use serde::{Deserialize, Serialize};
use serde_json::json;

use super::constants::{MAX_GAS, STAKE_TO_PLATFORM};
use crate::near::{Deposit, FunctionCallRequest, ViewRequest};

/// The `msg` attached to a token transfer that stakes into the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StakingMsg {
    Farm { farm_id: u16, lock_duration: u64 },
    Platform { staking_status: String },
}

impl StakingMsg {
    pub fn farm(farm_id: u16, lock_duration: u64) -> Self {
        StakingMsg::Farm {
            farm_id,
            lock_duration,
        }
    }

    pub fn platform() -> Self {
        StakingMsg::Platform {
            staking_status: STAKE_TO_PLATFORM.to_string(),
        }
    }

    pub fn to_msg_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapFarmParams {
    pub token_id: String,
    pub swap_rate: u128,
    pub decimal: u32,
    pub min_lock_time: u64,
    pub max_lock_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmParams {
    pub token_id: String,
    pub pool_id: u64,
    pub reward_token_id: String,
    pub token_reward_rate: u128,
    pub pool_reward_rate: u128,
    /// Milliseconds since the unix epoch.
    pub starting_at: u64,
    pub ending_at: u64,
}

/// Call builders for the masterchef-style staking contract.
#[derive(Debug, Clone)]
pub struct StakingContract {
    contract_id: String,
}

impl StakingContract {
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

    pub fn build_add_admin(&self, account_id: &str) -> FunctionCallRequest {
        self.call("add_admin")
            .with_args(json!({ "account_id": account_id }))
            .with_deposit(Deposit::ZERO)
    }

    pub fn build_remove_admin(&self, account_id: &str) -> FunctionCallRequest {
        self.call("remove_admin")
            .with_args(json!({ "account_id": account_id }))
            .with_deposit(Deposit::ZERO)
    }

    /// Creates the swap farm for `token_id`, or updates its lock window if it exists.
    pub fn build_save_swap_farm(&self, params: &SwapFarmParams) -> FunctionCallRequest {
        self.call("save_swap_farm")
            .with_args(json!({
                "token_id": params.token_id,
                "swap_rate": params.swap_rate.to_string(),
                "decimal": params.decimal,
                "min_lock_time": params.min_lock_time,
                "max_lock_time": params.max_lock_time,
            }))
            .with_deposit(Deposit::ONE_YOCTO)
    }

    pub fn build_add_farm(&self, params: &FarmParams) -> FunctionCallRequest {
        self.call("add_farm")
            .with_args(json!({
                "token_id": params.token_id,
                "pool_id": params.pool_id,
                "reward_token_id": params.reward_token_id,
                "token_reward_rate": params.token_reward_rate.to_string(),
                "pool_reward_rate": params.pool_reward_rate.to_string(),
                "starting_at": params.starting_at,
                "ending_at": params.ending_at,
            }))
            .with_deposit(Deposit::ONE_YOCTO)
    }

    pub fn build_claim_reward(&self) -> FunctionCallRequest {
        self.call("claim_reward").with_deposit(Deposit::ONE_YOCTO)
    }

    pub fn build_unstake(&self, token_type: &str, amount: u128) -> FunctionCallRequest {
        self.call("unstake")
            .with_args(json!({
                "token_type": token_type,
                "amount": amount.to_string(),
            }))
            .with_deposit(Deposit::ONE_YOCTO)
    }

    pub fn view_admin_list(&self) -> ViewRequest {
        ViewRequest::new(&self.contract_id, "get_adminlist")
    }

    pub fn view_farm_info(&self, farm_id: u16) -> ViewRequest {
        ViewRequest::new(&self.contract_id, "get_farm_info").with_args(json!({ "farm_id": farm_id }))
    }

    /// Claimable amounts of `account_id`, for one farm or across all of them.
    pub fn view_claim_amount(&self, account_id: &str, farm_id: Option<u16>) -> ViewRequest {
        let args = match farm_id {
            Some(farm_id) => json!({ "farm_id": farm_id, "account_id": account_id }),
            None => json!({ "account_id": account_id }),
        };
        ViewRequest::new(&self.contract_id, "get_claim_amount").with_args(args)
    }
}

/// `[starting_at, ending_at)` in milliseconds for a farm running `days` days.
///
/// `None` when the end does not fit in a `u64`.
pub fn farm_window(starting_at: u64, days: u64) -> Option<(u64, u64)> {
    let ending_at = days
        .checked_mul(super::constants::DAY_MS)?
        .checked_add(starting_at)?;
    Some((starting_at, ending_at))
}
