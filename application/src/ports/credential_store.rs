//! Credential store port
//!
//! Replaces ambient global key storage with an explicit service that is
//! injected into the orchestrator and has a load/save lifecycle.

use duet_domain::Credentials;
use std::sync::RwLock;
use thiserror::Error;

/// Errors raised while loading or saving credentials
#[derive(Error, Debug)]
pub enum CredentialStoreError {
    #[error("Credential store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Credential store is corrupt: {0}")]
    Corrupt(String),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Persistent source of provider credentials
pub trait CredentialStore: Send + Sync {
    /// Read the stored credentials. A store with nothing saved yields an empty set.
    fn load(&self) -> Result<Credentials, CredentialStoreError>;

    /// Replace the stored credentials
    fn save(&self, credentials: &Credentials) -> Result<(), CredentialStoreError>;
}

/// Process-local store, used in tests and when persistence is disabled
#[derive(Default)]
pub struct InMemoryCredentialStore {
    credentials: RwLock<Credentials>,
}

impl InMemoryCredentialStore {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: RwLock::new(credentials),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Result<Credentials, CredentialStoreError> {
        self.credentials
            .read()
            .map(|c| c.clone())
            .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))
    }

    fn save(&self, credentials: &Credentials) -> Result<(), CredentialStoreError> {
        let mut guard = self
            .credentials
            .write()
            .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))?;
        *guard = credentials.clone();
        Ok(())
    }
}
