use eyre::{Context, Result};
use log::warn;
use serde::Deserialize;
use shared::near::KeyPair;
use std::env;
use std::io::{self, Write};

/// Where the signing key of a command comes from.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum KeySource {
    /// `~/.near-credentials/<network>/<account>.json`
    CredentialStore,
    Environment(String),
    File(String),
    Interactive,
}

#[derive(Deserialize)]
struct CredentialJson {
    #[serde(alias = "secret_key")]
    private_key: String,
}

impl KeySource {
    pub(crate) fn from_arg(key_arg: Option<String>) -> Self {
        let Some(key) = key_arg else {
            return Self::CredentialStore;
        };
        if let Some(var_name) = key.strip_prefix("env:") {
            Self::Environment(var_name.to_string())
        } else if let Some(path) = key.strip_prefix("file:") {
            Self::File(path.to_string())
        } else {
            if key != "prompt" {
                warn!("Secret keys on the command line are not accepted.");
                warn!("Use 'env:VAR_NAME', 'file:/path/to/key' or 'prompt' instead.");
            }
            Self::Interactive
        }
    }

    /// Reads the key pair, or `None` when the credential store should be used.
    pub(crate) fn resolve(&self) -> Result<Option<KeyPair>> {
        let secret = match self {
            Self::CredentialStore => return Ok(None),
            Self::Environment(var_name) => env::var(var_name)
                .with_context(|| format!("Environment variable {var_name} not found"))?,
            Self::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read secret key from file: {path}"))?,
            Self::Interactive => {
                print!("Enter secret key (hidden): ");
                io::stdout().flush().context("Failed to flush stdout")?;
                rpassword::read_password().context("Failed to read secret key")?
            }
        };
        parse_secret(&secret).map(Some)
    }
}

/// Accepts either `ed25519:<base58>` or a credential file body.
fn parse_secret(secret: &str) -> Result<KeyPair> {
    let secret = secret.trim();
    let text = if secret.starts_with('{') {
        serde_json::from_str::<CredentialJson>(secret)
            .context("Failed to parse credential JSON")?
            .private_key
    } else {
        secret.to_string()
    };
    text.parse::<KeyPair>().context("Invalid secret key")
}
