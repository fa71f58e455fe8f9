use directories::BaseDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::crypto::{KeyError, KeyPair};

const CREDENTIALS_DIR: &str = ".near-credentials";

#[derive(Debug, thiserror::Error)]
pub enum KeyStoreError {
    #[error("could not determine the home directory for the credential store")]
    NoHomeDir,
    #[error("could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed credential file {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Storage of account key pairs, partitioned by network id.
pub trait KeyStore: Send + Sync + fmt::Debug {
    fn get_key(&self, network_id: &str, account_id: &str)
        -> Result<Option<KeyPair>, KeyStoreError>;

    fn set_key(
        &self,
        network_id: &str,
        account_id: &str,
        key_pair: &KeyPair,
    ) -> Result<(), KeyStoreError>;

    fn remove_key(&self, network_id: &str, account_id: &str) -> Result<(), KeyStoreError>;

    fn get_accounts(&self, network_id: &str) -> Result<Vec<String>, KeyStoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct CredentialFile {
    account_id: String,
    public_key: String,
    #[serde(alias = "secret_key")]
    private_key: String,
}

/// Plain JSON credential files laid out as `<root>/<network>/<account>.json`.
#[derive(Debug, Clone)]
pub struct UnencryptedFileSystemKeyStore {
    root: PathBuf,
}

impl UnencryptedFileSystemKeyStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at `~/.near-credentials`.
    pub fn from_home() -> Result<Self, KeyStoreError> {
        Self::default_root().map(Self::new)
    }

    pub fn default_root() -> Result<PathBuf, KeyStoreError> {
        BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(CREDENTIALS_DIR))
            .ok_or(KeyStoreError::NoHomeDir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key_path(&self, network_id: &str, account_id: &str) -> PathBuf {
        self.root
            .join(network_id)
            .join(format!("{account_id}.json"))
    }

    fn read_credentials(path: &Path) -> Result<Option<CredentialFile>, KeyStoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(KeyStoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|e| KeyStoreError::Malformed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

/// Writes `contents` to a file only the owner can read, from its creation on.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // An existing file keeps its old mode through open.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents)?;
    file.sync_all()
}

impl KeyStore for UnencryptedFileSystemKeyStore {
    fn get_key(
        &self,
        network_id: &str,
        account_id: &str,
    ) -> Result<Option<KeyPair>, KeyStoreError> {
        let path = self.key_path(network_id, account_id);
        let Some(credentials) = Self::read_credentials(&path)? else {
            debug!("no credential file at {}", path.display());
            return Ok(None);
        };
        let key_pair: KeyPair = credentials.private_key.parse()?;
        if key_pair.public_key().to_string() != credentials.public_key {
            return Err(KeyStoreError::Malformed {
                path,
                message: "public_key does not match private_key".to_string(),
            });
        }
        Ok(Some(key_pair))
    }

    fn set_key(
        &self,
        network_id: &str,
        account_id: &str,
        key_pair: &KeyPair,
    ) -> Result<(), KeyStoreError> {
        let path = self.key_path(network_id, account_id);
        let io_err = |source| KeyStoreError::Io {
            path: path.clone(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let credentials = CredentialFile {
            account_id: account_id.to_string(),
            public_key: key_pair.public_key().to_string(),
            private_key: key_pair.secret_key_string(),
        };
        let json = serde_json::to_string(&credentials).map_err(|e| KeyStoreError::Malformed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        write_private(&path, json.as_bytes()).map_err(io_err)?;

        debug!("stored key for {account_id} at {}", path.display());
        Ok(())
    }

    fn remove_key(&self, network_id: &str, account_id: &str) -> Result<(), KeyStoreError> {
        let path = self.key_path(network_id, account_id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(KeyStoreError::Io { path, source }),
        }
    }

    fn get_accounts(&self, network_id: &str) -> Result<Vec<String>, KeyStoreError> {
        let dir = self.root.join(network_id);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(KeyStoreError::Io { path: dir, source }),
        };

        let mut accounts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| KeyStoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let name = entry.file_name();
            if let Some(account) = name.to_str().and_then(|n| n.strip_suffix(".json")) {
                accounts.push(account.to_string());
            }
        }
        accounts.sort();
        Ok(accounts)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryKeyStore {
    keys: Mutex<HashMap<(String, String), KeyPair>>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(network_id: &str, account_id: &str, key_pair: KeyPair) -> Self {
        let store = Self::default();
        store
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((network_id.to_string(), account_id.to_string()), key_pair);
        store
    }
}

impl KeyStore for InMemoryKeyStore {
    fn get_key(
        &self,
        network_id: &str,
        account_id: &str,
    ) -> Result<Option<KeyPair>, KeyStoreError> {
        let keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(keys
            .get(&(network_id.to_string(), account_id.to_string()))
            .cloned())
    }

    fn set_key(
        &self,
        network_id: &str,
        account_id: &str,
        key_pair: &KeyPair,
    ) -> Result<(), KeyStoreError> {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                (network_id.to_string(), account_id.to_string()),
                key_pair.clone(),
            );
        Ok(())
    }

    fn remove_key(&self, network_id: &str, account_id: &str) -> Result<(), KeyStoreError> {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(network_id.to_string(), account_id.to_string()));
        Ok(())
    }

    fn get_accounts(&self, network_id: &str) -> Result<Vec<String>, KeyStoreError> {
        let keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        let mut accounts: Vec<String> = keys
            .keys()
            .filter(|(network, _)| network == network_id)
            .map(|(_, account)| account.clone())
            .collect();
        accounts.sort();
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        tempfile::tempdir().expect("Failed to create temp directory")
    }

    #[test]
    fn test_default_root_is_under_home() {
        let root = UnencryptedFileSystemKeyStore::default_root().unwrap();
        assert!(root.ends_with(".near-credentials"));
    }

    #[test]
    fn test_file_store_round_trip_and_layout() {
        let temp_dir = setup_test_dir();
        let store = UnencryptedFileSystemKeyStore::new(temp_dir.path());
        let key_pair = KeyPair::from_seed([11u8; 32]);

        store
            .set_key("testnet", "xuguangxia.testnet", &key_pair)
            .unwrap();

        let path = temp_dir
            .path()
            .join("testnet")
            .join("xuguangxia.testnet.json");
        assert!(path.exists());
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["account_id"], "xuguangxia.testnet");
        assert_eq!(written["public_key"], key_pair.public_key().to_string());

        let loaded = store.get_key("testnet", "xuguangxia.testnet").unwrap();
        assert_eq!(loaded, Some(key_pair));
        assert_eq!(store.get_key("mainnet", "xuguangxia.testnet").unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_keeps_secrets_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = setup_test_dir();
        let store = UnencryptedFileSystemKeyStore::new(temp_dir.path());
        let mode = |account: &str| {
            let path = store.key_path("testnet", account);
            fs::metadata(path).unwrap().permissions().mode() & 0o777
        };

        store
            .set_key("testnet", "fresh.testnet", &KeyPair::from_seed([13u8; 32]))
            .unwrap();
        assert_eq!(mode("fresh.testnet"), 0o600);

        let existing = store.key_path("testnet", "existing.testnet");
        fs::write(&existing, "{}").unwrap();
        fs::set_permissions(&existing, fs::Permissions::from_mode(0o644)).unwrap();
        store
            .set_key("testnet", "existing.testnet", &KeyPair::from_seed([14u8; 32]))
            .unwrap();
        assert_eq!(mode("existing.testnet"), 0o600);
    }

    #[test]
    fn test_file_store_accepts_secret_key_alias() {
        let temp_dir = setup_test_dir();
        let key_pair = KeyPair::from_seed([12u8; 32]);
        let dir = temp_dir.path().join("testnet");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("a.testnet.json"),
            serde_json::json!({
                "account_id": "a.testnet",
                "public_key": key_pair.public_key().to_string(),
                "secret_key": key_pair.secret_key_string(),
            })
            .to_string(),
        )
        .unwrap();

        let store = UnencryptedFileSystemKeyStore::new(temp_dir.path());
        assert_eq!(store.get_key("testnet", "a.testnet").unwrap(), Some(key_pair));
    }

    #[test]
    fn test_file_store_rejects_corrupt_files() {
        let temp_dir = setup_test_dir();
        let dir = temp_dir.path().join("testnet");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("bad.testnet.json"), "not json").unwrap();
        fs::write(
            dir.join("swapped.testnet.json"),
            serde_json::json!({
                "account_id": "swapped.testnet",
                "public_key": KeyPair::from_seed([1u8; 32]).public_key().to_string(),
                "private_key": KeyPair::from_seed([2u8; 32]).secret_key_string(),
            })
            .to_string(),
        )
        .unwrap();

        let store = UnencryptedFileSystemKeyStore::new(temp_dir.path());
        assert!(matches!(
            store.get_key("testnet", "bad.testnet"),
            Err(KeyStoreError::Malformed { .. })
        ));
        assert!(matches!(
            store.get_key("testnet", "swapped.testnet"),
            Err(KeyStoreError::Malformed { .. })
        ));
    }

    #[test]
    fn test_file_store_lists_and_removes_accounts() {
        let temp_dir = setup_test_dir();
        let store = UnencryptedFileSystemKeyStore::new(temp_dir.path());
        assert!(store.get_accounts("testnet").unwrap().is_empty());

        store
            .set_key("testnet", "b.testnet", &KeyPair::from_seed([1u8; 32]))
            .unwrap();
        store
            .set_key("testnet", "a.testnet", &KeyPair::from_seed([2u8; 32]))
            .unwrap();
        assert_eq!(
            store.get_accounts("testnet").unwrap(),
            vec!["a.testnet".to_string(), "b.testnet".to_string()]
        );

        store.remove_key("testnet", "a.testnet").unwrap();
        store.remove_key("testnet", "a.testnet").unwrap();
        assert_eq!(store.get_accounts("testnet").unwrap(), vec!["b.testnet".to_string()]);
    }

    #[test]
    fn test_in_memory_store() {
        let key_pair = KeyPair::from_seed([3u8; 32]);
        let store = InMemoryKeyStore::with_key("testnet", "a.testnet", key_pair.clone());
        assert_eq!(store.get_key("testnet", "a.testnet").unwrap(), Some(key_pair));
        assert_eq!(store.get_key("mainnet", "a.testnet").unwrap(), None);

        store.remove_key("testnet", "a.testnet").unwrap();
        assert!(store.get_accounts("testnet").unwrap().is_empty());
    }
}
