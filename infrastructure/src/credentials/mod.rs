//! Persistent credential storage

mod file_store;

pub use file_store::FileCredentialStore;
