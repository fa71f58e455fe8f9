pub mod account;
pub mod crypto;
pub mod keystore;
pub mod network;
pub mod request;
pub mod rpc;
pub mod transaction;
pub mod units;

pub use account::{Account, AccountError, Near};
pub use crypto::{KeyPair, PublicKey, Signature};
pub use keystore::{InMemoryKeyStore, KeyStore, UnencryptedFileSystemKeyStore};
pub use network::{NetworkConfig, NetworkId};
pub use request::{FunctionCallRequest, ViewRequest};
pub use rpc::{JsonRpcClient, RpcError};
pub use units::{Deposit, Gas};
