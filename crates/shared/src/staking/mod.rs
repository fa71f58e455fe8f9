//! Operator recipes for the staking contract, the Ref exchange and the
//! fungible tokens around them.
//!
//! Every builder returns a [`FunctionCallRequest`](crate::near::FunctionCallRequest)
//! or [`ViewRequest`](crate::near::ViewRequest); nothing is sent until it is
//! handed to an [`Account`](crate::near::Account).

pub mod constants;
pub mod contracts;
pub mod fungible_token;
pub mod provisioning;
pub mod ref_exchange;
pub mod staking_contract;

use serde_json::Value;

use crate::near::keystore::KeyStoreError;
use crate::near::AccountError;

pub use contracts::ContractIds;
pub use fungible_token::FungibleToken;
pub use ref_exchange::{pool_token_id, RefExchange};
pub use staking_contract::{farm_window, FarmParams, StakingContract, StakingMsg, SwapFarmParams};

#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("no {role} contract configured; set {env} or the [contracts] section")]
    MissingContract {
        role: &'static str,
        env: &'static str,
    },
    #[error("unexpected result from {method}: {value}")]
    UnexpectedView { method: String, value: Value },
    #[error("could not encode staking msg: {0}")]
    Msg(#[from] serde_json::Error),
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),
    #[error(transparent)]
    Account(#[from] AccountError),
}
