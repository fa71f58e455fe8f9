use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::near::{NetworkConfig, UnencryptedFileSystemKeyStore};
use shared::staking::ContractIds;
use std::path::{Path, PathBuf};

const DEFAULT_NETWORK: &str = "testnet";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) network: Option<String>,
    pub(crate) node_url: Option<String>,
    pub(crate) signer: Option<String>,
    pub(crate) credentials_dir: Option<PathBuf>,
    pub(crate) dry_run: bool,
    pub(crate) contracts: ContractIds,
}

impl Config {
    pub(crate) fn load(config_path: &Option<String>, env_file: &str) -> Result<Self> {
        dotenv::from_filename(env_file).ok();

        let mut config = if let Some(path) = config_path {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        Ok(config)
    }

    pub(crate) fn load_from_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {path}"))?;

        Ok(config)
    }

    pub(crate) fn load_from_env(&mut self) {
        if let Ok(network) = std::env::var("NEAR_ENV") {
            self.network = Some(network);
        }
        if let Ok(node_url) = std::env::var("NEAR_NODE_URL") {
            self.node_url = Some(node_url);
        }
        if let Ok(signer) = std::env::var("NEAR_SIGNER_ACCOUNT") {
            self.signer = Some(signer);
        }
        if let Ok(dir) = std::env::var("NEAR_CREDENTIALS_DIR") {
            self.credentials_dir = Some(PathBuf::from(dir));
        }
        self.contracts = std::mem::take(&mut self.contracts).with_env_overrides();
    }

    pub(crate) fn with_network(mut self, network: String) -> Self {
        self.network = Some(network);
        self
    }

    pub(crate) fn with_node_url(mut self, node_url: String) -> Self {
        self.node_url = Some(node_url);
        self
    }

    pub(crate) fn with_credentials_dir(mut self, dir: PathBuf) -> Self {
        self.credentials_dir = Some(dir);
        self
    }

    pub(crate) fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = self.dry_run || dry_run;
        self
    }

    pub(crate) fn network_setting(&self) -> &str {
        self.network.as_deref().unwrap_or(DEFAULT_NETWORK)
    }

    /// Endpoints of the selected network, with the node url override applied.
    pub(crate) fn network_config(&self) -> Result<NetworkConfig> {
        let setting = self.network_setting();
        let network = NetworkConfig::select(setting).ok_or_else(|| {
            eyre::eyre!("Unknown network `{setting}`. Use testnet or mainnet (--network or NEAR_ENV)")
        })?;
        Ok(match &self.node_url {
            Some(node_url) => network.with_node_url(node_url.clone()),
            None => network,
        })
    }

    pub(crate) fn key_store(&self) -> Result<UnencryptedFileSystemKeyStore> {
        match &self.credentials_dir {
            Some(dir) => Ok(UnencryptedFileSystemKeyStore::new(dir)),
            None => UnencryptedFileSystemKeyStore::from_home()
                .context("Failed to locate ~/.near-credentials; set NEAR_CREDENTIALS_DIR"),
        }
    }

    pub(crate) fn get_signer(&self, account: Option<String>) -> Result<String> {
        account.or_else(|| self.signer.clone()).ok_or_else(|| {
            eyre::eyre!("No signer account. Use --account or set NEAR_SIGNER_ACCOUNT")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const ENV_VARS: [&str; 7] = [
        "NEAR_ENV",
        "NEAR_NODE_URL",
        "NEAR_SIGNER_ACCOUNT",
        "NEAR_CREDENTIALS_DIR",
        "REACT_APP_STAKING_CONTRACT_ID",
        "REACT_APP_TOKEN_CONTRACT_ID",
        "REACT_APP_REF_CONTRACT_ID",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_select_testnet() {
        clear_env();
        let config = Config::load(&None, "does-not-exist.env").unwrap();
        let network = config.network_config().unwrap();
        assert_eq!(network.node_url, "https://rpc.testnet.near.org");
        assert_eq!(config.contracts, ContractIds::default());
    }

    #[test]
    #[serial]
    fn test_file_then_env_then_flags() {
        clear_env();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("staking.toml");
        fs::write(
            &path,
            r#"
network = "mainnet"
signer = "xuguangxia.testnet"

[contracts]
token = "token_test01.supernova11.testnet"
"#,
        )
        .unwrap();
        std::env::set_var("NEAR_NODE_URL", "http://127.0.0.1:3030");
        std::env::set_var("REACT_APP_STAKING_CONTRACT_ID", "other_staking.testnet");

        let config = Config::load(&Some(path.to_string_lossy().to_string()), "does-not-exist.env")
            .unwrap();
        clear_env();

        assert_eq!(config.network_setting(), "mainnet");
        assert_eq!(config.node_url.as_deref(), Some("http://127.0.0.1:3030"));
        assert_eq!(config.contracts.staking, "other_staking.testnet");
        assert_eq!(
            config.contracts.token.as_deref(),
            Some("token_test01.supernova11.testnet")
        );
        assert_eq!(config.get_signer(None).unwrap(), "xuguangxia.testnet");
        assert_eq!(
            config.get_signer(Some("a.testnet".to_string())).unwrap(),
            "a.testnet"
        );

        let network = config.with_network("testnet".to_string()).network_config().unwrap();
        assert_eq!(network.network_id.as_str(), "testnet");
        assert_eq!(network.node_url, "http://127.0.0.1:3030");
    }

    #[test]
    #[serial]
    fn test_env_file_is_loaded() {
        clear_env();
        let temp_dir = tempfile::tempdir().unwrap();
        let env_file = temp_dir.path().join(".env");
        fs::write(&env_file, "NEAR_SIGNER_ACCOUNT=from-dotenv.testnet\n").unwrap();

        let config = Config::load(&None, &env_file.to_string_lossy()).unwrap();
        clear_env();
        assert_eq!(config.signer.as_deref(), Some("from-dotenv.testnet"));
    }

    #[test]
    #[serial]
    fn test_unknown_network_is_an_error() {
        clear_env();
        let config = Config::default().with_network("betanet".to_string());
        let err = config.network_config().unwrap_err();
        assert!(err.to_string().contains("betanet"));
    }

    #[test]
    fn test_missing_config_file_falls_back_to_defaults() {
        let config = Config::load_from_file("/nonexistent/staking.toml").unwrap();
        assert!(config.network.is_none());
        assert!(!config.dry_run);
    }
}
