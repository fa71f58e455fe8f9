use eyre::Result;
use serde_json::json;

use super::common::print_json;
use crate::config::Config;

/// Prints the resolved network profile and contract ids.
pub(crate) fn handle_command(config: &Config) -> Result<()> {
    let network = config.network_config()?;
    let credentials_dir = config.key_store()?.root().display().to_string();
    print_json(&json!({
        "network": network,
        "contracts": config.contracts,
        "credentialsDir": credentials_dir,
    }))
}
