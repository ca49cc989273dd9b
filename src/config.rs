// Configuration: where tasks are persisted and with which backend

use crate::blob::{BlobStore, FileBlobStore, MemoryBlobStore, SqliteBlobStore};
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "taskflow";
const CONFIG_FILE: &str = "config.yaml";
const DB_FILE: &str = "taskflow.db";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub store_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            store_path: default_store_path(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`
    ///
    /// A missing file yields the defaults; a file that does not parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| eyre!("Invalid config: {}", e))
    }

    /// Build the configured blob store
    pub fn open_blob_store(&self) -> Result<Box<dyn BlobStore>> {
        debug!(backend = ?self.backend, path = %self.store_path.display(), "Opening blob store");
        let blob: Box<dyn BlobStore> = match self.backend {
            Backend::Sqlite => Box::new(SqliteBlobStore::open(self.store_path.join(DB_FILE))?),
            Backend::File => Box::new(FileBlobStore::open(&self.store_path)?),
            Backend::Memory => Box::new(MemoryBlobStore::new()),
        };
        Ok(blob)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".taskflow"))
}
