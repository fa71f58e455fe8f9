use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use super::crypto::PublicKey;
use super::request::ViewRequest;
use super::transaction::{CryptoHash, SignedTransaction};
use super::units::Deposit;

const JSON_RPC_ID: &str = "dontcare";

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("invalid node url `{0}`: {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("node answered HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("server error {name}/{cause}: {message}")]
    Server {
        name: String,
        cause: String,
        message: String,
        info: Option<Value>,
    },
    #[error("query failed: {message}")]
    Query { message: String, logs: Vec<String> },
    #[error("could not decode node response: {0}")]
    Decode(String),
    #[error("could not encode transaction: {0}")]
    Encode(String),
    #[error("transaction {tx_hash} failed: {failure}")]
    ExecutionFailure { tx_hash: String, failure: Value },
    #[error("transaction {tx_hash} has not finished executing")]
    Incomplete { tx_hash: String },
}

impl RpcError {
    /// Name of the node-side cause, e.g. `UNKNOWN_ACCESS_KEY`.
    pub fn cause_name(&self) -> Option<&str> {
        match self {
            RpcError::Server { cause, .. } => Some(cause.as_str()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            RpcError::Transport(e) => e.is_timeout(),
            RpcError::Server { cause, .. } => cause == "TIMEOUT_ERROR",
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    name: Option<String>,
    cause: Option<RpcErrorCause>,
    #[serde(default)]
    message: String,
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorCause {
    name: String,
    info: Option<Value>,
}

impl RpcErrorBody {
    fn into_error(self) -> RpcError {
        let (cause, info) = match self.cause {
            Some(cause) => (cause.name, cause.info),
            None => ("UNKNOWN".to_string(), self.data),
        };
        RpcError::Server {
            name: self.name.unwrap_or_else(|| "UNKNOWN".to_string()),
            cause,
            message: self.message,
            info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AccessKeyPermissionView {
    FullAccess,
    FunctionCall {
        allowance: Option<Deposit>,
        receiver_id: String,
        method_names: Vec<String>,
    },
}

impl AccessKeyPermissionView {
    pub fn receiver_id(&self) -> Option<&str> {
        match self {
            AccessKeyPermissionView::FullAccess => None,
            AccessKeyPermissionView::FunctionCall { receiver_id, .. } => Some(receiver_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccessKeyView {
    pub nonce: u64,
    pub permission: AccessKeyPermissionView,
    pub block_hash: CryptoHash,
    #[serde(default)]
    pub block_height: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessKeyEntry {
    pub nonce: u64,
    pub permission: AccessKeyPermissionView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessKeyInfoView {
    pub public_key: PublicKey,
    pub access_key: AccessKeyEntry,
}

#[derive(Debug, Deserialize)]
struct AccessKeyList {
    keys: Vec<AccessKeyInfoView>,
}

#[derive(Debug, Deserialize)]
struct CallResult {
    result: Vec<u8>,
    #[serde(default)]
    logs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum FinalExecutionStatus {
    NotStarted,
    Started,
    Failure(Value),
    SuccessValue(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutionOutcome {
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub gas_burnt: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutionOutcomeWithId {
    pub id: String,
    pub outcome: ExecutionOutcome,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FinalExecutionOutcome {
    pub status: FinalExecutionStatus,
    pub transaction_outcome: ExecutionOutcomeWithId,
    #[serde(default)]
    pub receipts_outcome: Vec<ExecutionOutcomeWithId>,
}

impl FinalExecutionOutcome {
    pub fn transaction_hash(&self) -> &str {
        &self.transaction_outcome.id
    }

    pub fn logs(&self) -> impl Iterator<Item = &str> {
        std::iter::once(&self.transaction_outcome)
            .chain(self.receipts_outcome.iter())
            .flat_map(|o| o.outcome.logs.iter().map(String::as_str))
    }

    pub fn total_gas_burnt(&self) -> u64 {
        std::iter::once(&self.transaction_outcome)
            .chain(self.receipts_outcome.iter())
            .map(|o| o.outcome.gas_burnt)
            .sum()
    }

    /// Decodes the return value of a finished transaction.
    ///
    /// Failures become [`RpcError::ExecutionFailure`]. Non-JSON return values
    /// are passed through as a string.
    pub fn into_result(self) -> Result<Option<Value>, RpcError> {
        let tx_hash = self.transaction_outcome.id;
        match self.status {
            FinalExecutionStatus::SuccessValue(encoded) => {
                let bytes = STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|e| RpcError::Decode(format!("success value: {e}")))?;
                Ok(decode_return_value(&bytes))
            }
            FinalExecutionStatus::Failure(failure) => {
                Err(RpcError::ExecutionFailure { tx_hash, failure })
            }
            FinalExecutionStatus::NotStarted | FinalExecutionStatus::Started => {
                Err(RpcError::Incomplete { tx_hash })
            }
        }
    }
}

fn decode_return_value(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    Some(
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned())),
    )
}

/// Minimal NEAR JSON-RPC client covering queries and commit broadcasts.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    client: reqwest::Client,
    url: Url,
}

impl JsonRpcClient {
    pub fn new(node_url: &str) -> Result<Self, RpcError> {
        let url = Url::parse(node_url)
            .map_err(|e| RpcError::InvalidUrl(node_url.to_string(), e))?;
        Ok(Self {
            client: reqwest::Client::new(),
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<R, RpcError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": JSON_RPC_ID,
            "method": method,
            "params": params,
        });
        debug!("rpc {} -> {}", method, self.url);

        let response = self.client.post(self.url.clone()).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        let parsed: RpcResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(RpcError::HttpStatus {
                    status: status.as_u16(),
                    body: text,
                })
            }
            Err(e) => return Err(RpcError::Decode(e.to_string())),
        };

        if let Some(error) = parsed.error {
            return Err(error.into_error());
        }
        let result = parsed
            .result
            .ok_or_else(|| RpcError::Decode("response has neither result nor error".to_string()))?;
        serde_json::from_value(result).map_err(|e| RpcError::Decode(e.to_string()))
    }

    /// Runs a `query` and surfaces the legacy in-result `error` field as an error.
    pub async fn query(&self, params: Value) -> Result<Value, RpcError> {
        let result: Value = self.call("query", params).await?;
        if let Some(message) = result.get("error").and_then(Value::as_str) {
            let logs = result
                .get("logs")
                .and_then(|logs| serde_json::from_value(logs.clone()).ok())
                .unwrap_or_default();
            return Err(RpcError::Query {
                message: message.to_string(),
                logs,
            });
        }
        Ok(result)
    }

    pub async fn view_access_key(
        &self,
        account_id: &str,
        public_key: &PublicKey,
    ) -> Result<AccessKeyView, RpcError> {
        let result = self
            .query(json!({
                "request_type": "view_access_key",
                "finality": "final",
                "account_id": account_id,
                "public_key": public_key.to_string(),
            }))
            .await?;
        serde_json::from_value(result).map_err(|e| RpcError::Decode(e.to_string()))
    }

    pub async fn view_access_key_list(
        &self,
        account_id: &str,
    ) -> Result<Vec<AccessKeyInfoView>, RpcError> {
        let result = self
            .query(json!({
                "request_type": "view_access_key_list",
                "finality": "final",
                "account_id": account_id,
            }))
            .await?;
        let list: AccessKeyList =
            serde_json::from_value(result).map_err(|e| RpcError::Decode(e.to_string()))?;
        Ok(list.keys)
    }

    /// Calls a view method and decodes its JSON return value.
    pub async fn call_function(&self, request: &ViewRequest) -> Result<Value, RpcError> {
        let args = serde_json::to_vec(&request.args).map_err(|e| RpcError::Encode(e.to_string()))?;
        let result = self
            .query(json!({
                "request_type": "call_function",
                "finality": "optimistic",
                "account_id": request.contract_id,
                "method_name": request.method_name,
                "args_base64": STANDARD.encode(args),
            }))
            .await?;
        let call: CallResult =
            serde_json::from_value(result).map_err(|e| RpcError::Decode(e.to_string()))?;
        for line in &call.logs {
            debug!("{}: {}", request.contract_id, line);
        }
        Ok(decode_return_value(&call.result).unwrap_or(Value::Null))
    }

    pub async fn broadcast_tx_commit(
        &self,
        transaction: &SignedTransaction,
    ) -> Result<FinalExecutionOutcome, RpcError> {
        let encoded = transaction
            .to_base64()
            .map_err(|e| RpcError::Encode(e.to_string()))?;
        self.call("broadcast_tx_commit", json!([encoded])).await
    }
}
