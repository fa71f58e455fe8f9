use borsh::BorshSerialize;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand_v8::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

const ED25519_PREFIX: &str = "ed25519:";
/// Borsh tag of the ed25519 key type.
const ED25519_KEY_TYPE: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("key `{0}` is missing the `ed25519:` prefix")]
    UnsupportedKeyType(String),
    #[error("invalid base58 in key: {0}")]
    Base58(String),
    #[error("expected {expected} key bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("secret and public halves of the key pair do not match")]
    Mismatch,
}

fn decode_ed25519(s: &str) -> Result<Vec<u8>, KeyError> {
    let encoded = s
        .trim()
        .strip_prefix(ED25519_PREFIX)
        .ok_or_else(|| KeyError::UnsupportedKeyType(s.to_string()))?;
    bs58::decode(encoded)
        .into_vec()
        .map_err(|e| KeyError::Base58(e.to_string()))
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        key.verify(message, &ed25519_dalek::Signature::from_bytes(&signature.0))
            .is_ok()
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_ed25519(s)?;
        let actual = bytes.len();
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| KeyError::InvalidLength {
                expected: 32,
                actual,
            })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ED25519_PREFIX}{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl BorshSerialize for PublicKey {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&[ED25519_KEY_TYPE])?;
        writer.write_all(&self.0)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ED25519_PREFIX}{}", bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}

impl BorshSerialize for Signature {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&[ED25519_KEY_TYPE])?;
        writer.write_all(&self.0)
    }
}

/// An ed25519 key pair in the `ed25519:<base58>` text form used by the
/// credential files.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    pub fn from_random() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }

    /// The secret key text, `ed25519:` followed by base58 of secret||public.
    pub fn secret_key_string(&self) -> String {
        format!(
            "{ED25519_PREFIX}{}",
            bs58::encode(self.signing_key.to_keypair_bytes()).into_string()
        )
    }
}

impl FromStr for KeyPair {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_ed25519(s)?;
        match bytes.len() {
            64 => {
                let mut keypair = [0u8; 64];
                keypair.copy_from_slice(&bytes);
                SigningKey::from_keypair_bytes(&keypair)
                    .map(|signing_key| Self { signing_key })
                    .map_err(|_| KeyError::Mismatch)
            }
            32 => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(&bytes);
                Ok(Self::from_seed(seed))
            }
            actual => Err(KeyError::InvalidLength {
                expected: 64,
                actual,
            }),
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.signing_key.to_keypair_bytes() == other.signing_key.to_keypair_bytes()
    }
}

impl Eq for KeyPair {}
