use serde::{Deserialize, Serialize};

use super::constants::{
    DEFAULT_REF_CONTRACT_ID, DEFAULT_STAKING_CONTRACT_ID, DEFAULT_WRAP_CONTRACT_ID,
    REF_CONTRACT_ENV, STAKING_CONTRACT_ENV, TOKEN_CONTRACT_ENV,
};
use super::fungible_token::FungibleToken;
use super::ref_exchange::RefExchange;
use super::staking_contract::StakingContract;
use super::RecipeError;

/// Account ids of the contracts the recipes talk to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractIds {
    pub staking: String,
    /// The staked fungible token. There is no default.
    pub token: Option<String>,
    pub ref_exchange: String,
    pub wrap: String,
}

impl Default for ContractIds {
    fn default() -> Self {
        Self {
            staking: DEFAULT_STAKING_CONTRACT_ID.to_string(),
            token: None,
            ref_exchange: DEFAULT_REF_CONTRACT_ID.to_string(),
            wrap: DEFAULT_WRAP_CONTRACT_ID.to_string(),
        }
    }
}

impl ContractIds {
    /// Applies `REACT_APP_*_CONTRACT_ID` overrides read through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(staking) = get(STAKING_CONTRACT_ENV) {
            self.staking = staking;
        }
        if let Some(token) = get(TOKEN_CONTRACT_ENV) {
            self.token = Some(token);
        }
        if let Some(ref_exchange) = get(REF_CONTRACT_ENV) {
            self.ref_exchange = ref_exchange;
        }
        self
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn staking_contract(&self) -> StakingContract {
        StakingContract::new(&self.staking)
    }

    pub fn ref_exchange(&self) -> RefExchange {
        RefExchange::new(&self.ref_exchange)
    }

    pub fn wrap_token(&self) -> FungibleToken {
        FungibleToken::new(&self.wrap)
    }

    pub fn token(&self) -> Result<FungibleToken, RecipeError> {
        self.token
            .as_deref()
            .map(FungibleToken::new)
            .ok_or(RecipeError::MissingContract {
                role: "token",
                env: TOKEN_CONTRACT_ENV,
            })
    }
}
