//! File-backed credential store.
//!
//! Entries live in a single JSON object at `~/.lingua/credentials.json`.
//! On Unix the file is created with mode `0600`. Writes go to a sibling
//! temporary file that is renamed over the old one, so a reader never sees a
//! partially written file.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::traits::{CredentialStore, CredentialsError};

const CREDENTIALS_DIR: &str = ".lingua";
const CREDENTIALS_FILE: &str = "credentials.json";

type Entries = BTreeMap<String, String>;

/// Durable key-value store for the refresh credential.
///
/// # Example
///
/// ```ignore
/// use lingua::adapters::FileCredentialStore;
/// use lingua::traits::CredentialStore;
///
/// let store = FileCredentialStore::new()?;
/// store.set("lingua_refresh_token", "R1").await?;
/// ```
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    /// Serializes access to the file within this process.
    lock: tokio::sync::Mutex<()>,
}

impl FileCredentialStore {
    /// Store under the user's home directory.
    pub fn new() -> Result<Self, CredentialsError> {
        let home = dirs::home_dir().ok_or_else(|| {
            CredentialsError::Other("Failed to determine home directory".to_string())
        })?;
        Ok(Self::with_dir(home.join(CREDENTIALS_DIR)))
    }

    /// Store in `dir` instead of the home directory.
    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CREDENTIALS_FILE),
            lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn credentials_path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, CredentialsError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(CredentialsError::LoadFailed(e.to_string())),
        };
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| CredentialsError::Serialization(e.to_string()))
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), CredentialsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
            }
        }

        let staging = self.path.with_extension("json.tmp");
        let file = open_private(&staging).map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, entries)
            .map_err(|e| CredentialsError::Serialization(e.to_string()))?;
        writer.flush()?;
        drop(writer);

        fs::rename(&staging, &self.path).map_err(|e| CredentialsError::SaveFailed(e.to_string()))
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CredentialsError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries()?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CredentialsError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    async fn delete(&self, key: &str) -> Result<(), CredentialsError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }

        if entries.is_empty() {
            fs::remove_file(&self.path).map_err(|e| CredentialsError::ClearFailed(e.to_string()))
        } else {
            self.write_entries(&entries)
        }
    }
}
