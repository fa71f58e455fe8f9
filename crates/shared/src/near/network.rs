use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    Testnet,
    Mainnet,
}

impl NetworkId {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkId::Testnet => "testnet",
            NetworkId::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown network `{0}`, expected `testnet` or `mainnet`")]
pub struct UnknownNetwork(pub String);

impl FromStr for NetworkId {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "testnet" => Ok(NetworkId::Testnet),
            "mainnet" => Ok(NetworkId::Mainnet),
            other => Err(UnknownNetwork(other.to_string())),
        }
    }
}

/// Endpoint set of one network profile.
///
/// URLs are kept exactly as configured so they can be compared and printed
/// without normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub network_id: NetworkId,
    pub node_url: String,
    pub wallet_url: String,
    pub helper_url: String,
    pub explorer_url: String,
}

impl NetworkConfig {
    pub fn testnet() -> Self {
        Self {
            network_id: NetworkId::Testnet,
            node_url: "https://rpc.testnet.near.org".to_string(),
            wallet_url: "https://wallet.testnet.near.org".to_string(),
            helper_url: "https://helper.testnet.near.org".to_string(),
            explorer_url: "https://explorer.testnet.near.org".to_string(),
        }
    }

    pub fn mainnet() -> Self {
        Self {
            network_id: NetworkId::Mainnet,
            node_url: "https://rpc.mainnet.near.org".to_string(),
            wallet_url: "https://wallet.near.org".to_string(),
            helper_url: "https://helper.mainnet.near.org".to_string(),
            explorer_url: "https://explorer.mainnet.near.org".to_string(),
        }
    }

    pub fn for_network(network_id: NetworkId) -> Self {
        match network_id {
            NetworkId::Testnet => Self::testnet(),
            NetworkId::Mainnet => Self::mainnet(),
        }
    }

    /// Resolves a profile name into its endpoint set.
    ///
    /// Unknown names produce no configuration and a warning, the caller
    /// decides whether that is fatal.
    pub fn select(setting: &str) -> Option<Self> {
        match setting.parse::<NetworkId>() {
            Ok(network_id) => {
                info!("configuration set to {network_id}");
                Some(Self::for_network(network_id))
            }
            Err(_) => {
                warn!("please choose a configuration (got `{setting}`)");
                None
            }
        }
    }

    pub fn with_node_url(mut self, node_url: impl Into<String>) -> Self {
        self.node_url = node_url.into();
        self
    }

    pub fn explorer_transaction_url(&self, tx_hash: &str) -> String {
        format!(
            "{}/transactions/{}",
            self.explorer_url.trim_end_matches('/'),
            tx_hash
        )
    }
}
