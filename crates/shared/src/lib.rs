pub mod near;
pub mod staking;
