//! Token Store
//!
//! Persists the bearer token and the values cached alongside it. Storage
//! failures are logged and read back as "nothing stored".

use tracing::{debug, warn};

use crate::models::UserProfile;
use crate::storage::{SecureStorage, StorageError};

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_PROFILE_KEY: &str = "userProfile";
pub const COIN_BALANCE_KEY: &str = "coinBalance";

/// Bearer token persistence
#[derive(Debug, Clone)]
pub struct TokenStore {
    storage: SecureStorage,
}

impl TokenStore {
    pub fn new(storage: SecureStorage) -> Self {
        Self { storage }
    }

    /// Persist the token. Never fails; errors are logged.
    pub fn set(&self, token: &str) {
        if let Err(e) = self.storage.save(AUTH_TOKEN_KEY, token) {
            warn!("Failed to store auth token: {}", e);
        }
    }

    pub fn get(&self) -> Option<String> {
        self.read(AUTH_TOKEN_KEY).filter(|t: &String| !t.is_empty())
    }

    /// Remove the token together with the cached profile and balance
    pub fn remove(&self) {
        for key in [AUTH_TOKEN_KEY, USER_PROFILE_KEY, COIN_BALANCE_KEY] {
            if let Err(e) = self.storage.delete(key) {
                warn!("Failed to remove {}: {}", key, e);
            }
        }
        debug!("Stored credentials cleared");
    }

    pub fn exists(&self) -> bool {
        self.get().is_some()
    }

    pub fn cache_profile(&self, profile: &UserProfile) {
        if let Err(e) = self.storage.save(USER_PROFILE_KEY, profile) {
            warn!("Failed to cache user profile: {}", e);
        }
    }

    pub fn cached_profile(&self) -> Option<UserProfile> {
        self.read(USER_PROFILE_KEY)
    }

    pub fn cache_balance(&self, balance: u64) {
        if let Err(e) = self.storage.save(COIN_BALANCE_KEY, &balance) {
            warn!("Failed to cache coin balance: {}", e);
        }
    }

    pub fn cached_balance(&self) -> Option<u64> {
        self.read(COIN_BALANCE_KEY)
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.storage.load(key) {
            Ok(value) => Some(value),
            Err(StorageError::NotFound(_)) => None,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TokenStore, TempDir) {
        let dir = TempDir::new().unwrap();
        (TokenStore::new(SecureStorage::open(dir.path())), dir)
    }

    fn profile() -> UserProfile {
        UserProfile {
            user_id: 1,
            email: Some("sam@example.com".into()),
            first_name: None,
            last_name: None,
            role_name: "ROLE_STUDENT".into(),
            step_name: None,
        }
    }

    #[test]
    fn set_then_get() {
        let (store, _dir) = store();
        assert!(!store.exists());

        store.set("abc.def.ghi");
        assert_eq!(store.get().as_deref(), Some("abc.def.ghi"));
        assert!(store.exists());
    }

    #[test]
    fn remove_clears_token_profile_and_balance() {
        let (store, _dir) = store();
        store.set("token");
        store.cache_profile(&profile());
        store.cache_balance(120);

        store.remove();

        assert_eq!(store.get(), None);
        assert_eq!(store.cached_profile(), None);
        assert_eq!(store.cached_balance(), None);
    }

    #[test]
    fn broken_storage_degrades_to_no_token() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let store = TokenStore::new(SecureStorage::open(blocker.join("sub")));

        store.set("token");
        assert_eq!(store.get(), None);
        store.remove();
        assert!(!store.exists());
    }

    #[test]
    fn corrupt_token_reads_as_none() {
        let (store, dir) = store();
        std::fs::write(dir.path().join("authToken.dat"), b"\xff\xfe").unwrap();
        assert_eq!(store.get(), None);
    }
}
