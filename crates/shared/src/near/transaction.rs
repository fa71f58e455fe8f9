//! Borsh encoding of transactions and actions.
//!
//! Variant order of [`Action`] and [`AccessKeyPermission`] is part of the
//! wire format and must not be reordered.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use borsh::BorshSerialize;
use serde::{Deserialize, Deserializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use super::crypto::{KeyPair, PublicKey, Signature};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, BorshSerialize)]
pub struct CryptoHash(pub [u8; 32]);

impl CryptoHash {
    pub fn hash_bytes(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }
}

impl fmt::Display for CryptoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for CryptoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CryptoHash({self})")
    }
}

impl FromStr for CryptoHash {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s).into_vec().map_err(|e| e.to_string())?;
        let len = bytes.len();
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| format!("expected 32 hash bytes, got {len}"))
    }
}

impl<'de> Deserialize<'de> for CryptoHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct CreateAccountAction {}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct DeployContractAction {
    pub code: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct FunctionCallAction {
    pub method_name: String,
    pub args: Vec<u8>,
    pub gas: u64,
    pub deposit: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct TransferAction {
    pub deposit: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct StakeAction {
    pub stake: u128,
    pub public_key: PublicKey,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct FunctionCallPermission {
    pub allowance: Option<u128>,
    pub receiver_id: String,
    pub method_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub enum AccessKeyPermission {
    FunctionCall(FunctionCallPermission),
    FullAccess,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct AccessKey {
    pub nonce: u64,
    pub permission: AccessKeyPermission,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct AddKeyAction {
    pub public_key: PublicKey,
    pub access_key: AccessKey,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct DeleteKeyAction {
    pub public_key: PublicKey,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct DeleteAccountAction {
    pub beneficiary_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub enum Action {
    CreateAccount(CreateAccountAction),
    DeployContract(DeployContractAction),
    FunctionCall(FunctionCallAction),
    Transfer(TransferAction),
    Stake(StakeAction),
    AddKey(AddKeyAction),
    DeleteKey(DeleteKeyAction),
    DeleteAccount(DeleteAccountAction),
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct Transaction {
    pub signer_id: String,
    pub public_key: PublicKey,
    pub nonce: u64,
    pub receiver_id: String,
    pub block_hash: CryptoHash,
    pub actions: Vec<Action>,
}

impl Transaction {
    pub fn hash(&self) -> std::io::Result<CryptoHash> {
        let bytes = borsh::to_vec(self)?;
        Ok(CryptoHash::hash_bytes(&bytes))
    }

    pub fn sign(self, key_pair: &KeyPair) -> std::io::Result<SignedTransaction> {
        let hash = self.hash()?;
        let signature = key_pair.sign(&hash.0);
        Ok(SignedTransaction {
            transaction: self,
            signature,
            hash,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: Signature,
    hash: CryptoHash,
}

impl SignedTransaction {
    pub fn hash(&self) -> CryptoHash {
        self.hash
    }

    pub fn to_base64(&self) -> std::io::Result<String> {
        Ok(STANDARD.encode(borsh::to_vec(self)?))
    }
}

impl BorshSerialize for SignedTransaction {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.transaction.serialize(writer)?;
        self.signature.serialize(writer)
    }
}
