use crate::near::{Deposit, Gas};

pub const MAX_GAS: Gas = Gas::MAX;

/// Storage registration on the Ref exchange.
pub const REF_STORAGE_DEPOSIT: Deposit = Deposit(1_020_000_000_000_000_000_000);
pub const MFT_REGISTER_DEPOSIT: Deposit = Deposit(1_040_000_000_000_000_000_000);
pub const SIMPLE_POOL_DEPOSIT: Deposit = Deposit(100_000_000_000_000_000_000_000);
/// Gas allowance of provisioned function-call keys (0.25 NEAR).
pub const FUNCTION_KEY_ALLOWANCE: Deposit = Deposit(250_000_000_000_000_000_000_000);

pub const DAY_MS: u64 = 86_400_000;

pub const DEFAULT_STAKING_CONTRACT_ID: &str = "uon_staking_test_09.xuguangxia.testnet";
pub const DEFAULT_REF_CONTRACT_ID: &str = "ref-finance-101.testnet";
pub const DEFAULT_WRAP_CONTRACT_ID: &str = "wrap.testnet";

pub const STAKING_CONTRACT_ENV: &str = "REACT_APP_STAKING_CONTRACT_ID";
pub const TOKEN_CONTRACT_ENV: &str = "REACT_APP_TOKEN_CONTRACT_ID";
pub const REF_CONTRACT_ENV: &str = "REACT_APP_REF_CONTRACT_ID";

pub const STAKE_TO_PLATFORM: &str = "Stake to Platform";
