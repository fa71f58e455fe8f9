//! Local RPC node and credential store for command handler tests.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use shared::near::transaction::CryptoHash;
use shared::near::{KeyPair, KeyStore, UnencryptedFileSystemKeyStore};
use tempfile::TempDir;

use crate::config::Config;

pub(crate) const SIGNER: &str = "xuguangxia.testnet";

pub(crate) struct TestNode {
    server: ServerGuard,
    credentials: TempDir,
}

impl TestNode {
    pub(crate) async fn start() -> Self {
        let server = Server::new_async().await;
        let credentials = tempfile::tempdir().unwrap();
        UnencryptedFileSystemKeyStore::new(credentials.path())
            .set_key("testnet", SIGNER, &KeyPair::from_seed([31u8; 32]))
            .unwrap();
        Self {
            server,
            credentials,
        }
    }

    /// Config that signs as [`SIGNER`] against this node.
    pub(crate) fn config(&self) -> Config {
        Config {
            node_url: Some(self.server.url()),
            signer: Some(SIGNER.to_string()),
            credentials_dir: Some(self.credentials.path().to_path_buf()),
            ..Config::default()
        }
    }

    /// Nonce lookups of the signer's key, `hits` times.
    pub(crate) async fn mock_access_key(&mut self, hits: usize) -> Mock {
        self.server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "method": "query",
                "params": { "request_type": "view_access_key", "account_id": SIGNER }
            })))
            .with_status(200)
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": "dontcare",
                    "result": {
                        "nonce": 7,
                        "permission": "FullAccess",
                        "block_height": 1,
                        "block_hash": CryptoHash([4u8; 32]).to_string(),
                    }
                })
                .to_string(),
            )
            .expect(hits)
            .create_async()
            .await
    }

    /// One signed call of `method` on `receiver_id` whose JSON args contain `args_fragment`.
    pub(crate) async fn mock_call(&mut self, receiver_id: &str, method: &str, args_fragment: &str) -> Mock {
        let needles = [
            borsh_string(receiver_id),
            borsh_string(method),
            args_fragment.as_bytes().to_vec(),
        ];
        self.server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": "broadcast_tx_commit" })))
            .match_request(move |request| {
                let Some(tx) = request.body().ok().and_then(|body| signed_tx_bytes(body)) else {
                    return false;
                };
                needles
                    .iter()
                    .all(|needle| tx.windows(needle.len()).any(|window| window == needle.as_slice()))
            })
            .with_status(200)
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": "dontcare",
                    "result": {
                        "status": { "SuccessValue": "" },
                        "transaction_outcome": { "id": "7yTx", "outcome": { "logs": [], "gas_burnt": 1 } },
                        "receipts_outcome": [],
                    }
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await
    }
}

fn borsh_string(value: &str) -> Vec<u8> {
    let mut bytes = (value.len() as u32).to_le_bytes().to_vec();
    bytes.extend_from_slice(value.as_bytes());
    bytes
}

fn signed_tx_bytes(body: &[u8]) -> Option<Vec<u8>> {
    let body: Value = serde_json::from_slice(body).ok()?;
    STANDARD.decode(body["params"][0].as_str()?).ok()
}

/// Config that only prints payloads.
pub(crate) fn dry_run_config() -> Config {
    Config {
        node_url: Some("http://127.0.0.1:1".to_string()),
        signer: Some(SIGNER.to_string()),
        ..Config::default()
    }
    .with_dry_run(true)
}
