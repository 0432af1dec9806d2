//! Secure Storage Module
//!
//! Key/value persistence on disk, one file per key. Values are JSON and are
//! protected with DPAPI on Windows.

use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use tracing::{debug, error};

#[cfg(windows)]
use windows::Win32::Security::Cryptography::{
    CryptProtectData, CryptUnprotectData, CRYPTPROTECT_UI_FORBIDDEN, CRYPT_INTEGER_BLOB,
};

/// File-backed key/value storage
#[derive(Debug, Clone)]
pub struct SecureStorage {
    storage_path: PathBuf,
}

impl SecureStorage {
    /// Open storage rooted at `storage_path`, creating the directory if needed.
    ///
    /// A directory that cannot be created is logged, not returned: every later
    /// operation on it fails with [`StorageError::Io`] instead.
    pub fn open(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();

        if let Err(e) = std::fs::create_dir_all(&storage_path) {
            error!("Failed to create storage directory {:?}: {}", storage_path, e);
        }

        debug!("Secure storage initialized at: {:?}", storage_path);

        Self { storage_path }
    }

    /// Serialize and save a value under `key`
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<(), StorageError> {
        let json = serde_json::to_vec(data)?;
        let encrypted = protect(&json)?;

        std::fs::write(self.file_for(key), encrypted)?;

        debug!("Saved data for key: {}", key);
        Ok(())
    }

    /// Load and deserialize the value under `key`
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<T, StorageError> {
        let file_path = self.file_for(key);
        if !file_path.exists() {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let encrypted = std::fs::read(&file_path)?;
        let decrypted = unprotect(&encrypted)?;

        Ok(serde_json::from_slice(&decrypted)?)
    }

    /// Delete the value under `key`; deleting a missing key is not an error
    pub fn delete(&self, key: &str) -> Result<(), StorageError> {
        let file_path = self.file_for(key);

        if file_path.exists() {
            std::fs::remove_file(&file_path)?;
            debug!("Deleted stored data for key: {}", key);
        }

        Ok(())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.file_for(key).is_file()
    }

    fn file_for(&self, key: &str) -> PathBuf {
        self.storage_path.join(format!("{}.dat", key))
    }
}

#[cfg(windows)]
fn protect(data: &[u8]) -> Result<Vec<u8>, StorageError> {
    dpapi(data, true).ok_or_else(|| StorageError::Encryption("DPAPI encryption failed".into()))
}

#[cfg(windows)]
fn unprotect(data: &[u8]) -> Result<Vec<u8>, StorageError> {
    dpapi(data, false).ok_or_else(|| StorageError::Decryption("DPAPI decryption failed".into()))
}

#[cfg(windows)]
fn dpapi(data: &[u8], encrypt: bool) -> Option<Vec<u8>> {
    let input = CRYPT_INTEGER_BLOB {
        cbData: data.len() as u32,
        pbData: data.as_ptr() as *mut u8,
    };
    let mut output = CRYPT_INTEGER_BLOB {
        cbData: 0,
        pbData: std::ptr::null_mut(),
    };

    unsafe {
        let result = if encrypt {
            CryptProtectData(&input, None, None, None, None, CRYPTPROTECT_UI_FORBIDDEN, &mut output)
        } else {
            CryptUnprotectData(&input, None, None, None, None, CRYPTPROTECT_UI_FORBIDDEN, &mut output)
        };
        if result.is_err() {
            return None;
        }

        let bytes = std::slice::from_raw_parts(output.pbData, output.cbData as usize).to_vec();

        // Output buffer is allocated by DPAPI
        let _ = windows::Win32::Foundation::LocalFree(windows::Win32::Foundation::HLOCAL(
            output.pbData as *mut std::ffi::c_void,
        ));

        Some(bytes)
    }
}

#[cfg(not(windows))]
fn protect(data: &[u8]) -> Result<Vec<u8>, StorageError> {
    Ok(data.to_vec())
}

#[cfg(not(windows))]
fn unprotect(data: &[u8]) -> Result<Vec<u8>, StorageError> {
    Ok(data.to_vec())
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No stored value for key: {0}")]
    NotFound(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(String),
}
