//! JSON file credential store.
//!
//! Keys are kept in a single JSON object (`{"openai": "...", ...}`). On unix
//! the file is created with mode 0600.

use duet_application::{CredentialStore, CredentialStoreError};
use duet_domain::Credentials;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_for_write(&self) -> std::io::Result<fs::File> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        options.open(&self.path)
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Credentials, CredentialStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No credential file at {}", self.path.display());
                return Ok(Credentials::default());
            }
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Credentials::default());
        }
        serde_json::from_str(&contents).map_err(|e| {
            CredentialStoreError::Corrupt(format!("{}: {}", self.path.display(), e))
        })
    }

    fn save(&self, credentials: &Credentials) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(credentials)
            .map_err(|e| CredentialStoreError::Corrupt(e.to_string()))?;
        let mut file = self.open_for_write()?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        debug!(
            "Saved credentials for {:?} to {}",
            credentials.configured(),
            self.path.display()
        );
        Ok(())
    }
}
