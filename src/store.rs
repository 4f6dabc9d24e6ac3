use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use url::Url;

const STORE_FILE_VERSION: u32 = 1;

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for &mut T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    origins: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: STORE_FILE_VERSION,
            origins: BTreeMap::new(),
        }
    }
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    origin: String,
    file: StoreFile,
    read_only: bool,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>, origin: &Url) -> Self {
        let path = path.into();
        let origin = origin.origin().ascii_serialization();
        // An unreadable file may hold other origins' data; never write over it.
        let (file, read_only) = match load_store_file(&path) {
            Ok(Some(file)) => (file, false),
            Ok(None) => (StoreFile::default(), false),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %format!("{err:#}"), "ignoring unreadable preference store");
                (StoreFile::default(), true)
            }
        };
        tracing::debug!(path = %path.display(), %origin, read_only, "opened preference store");
        Self {
            path,
            origin,
            file,
            read_only,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn persist(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }
        let bytes = serde_json::to_vec_pretty(&self.file).context("encode preference store")?;
        std::fs::write(&self.path, bytes).with_context(|| format!("write {}", self.path.display()))
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.file
            .origins
            .get(&self.origin)?
            .get(key)?
            .as_str()
            .map(str::to_owned)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.file
            .origins
            .entry(self.origin.clone())
            .or_default()
            .insert(key.to_string(), serde_json::Value::String(value.to_string()));
        if self.read_only {
            tracing::warn!(key, path = %self.path.display(), "preference store is unreadable; keeping value in memory only");
            return;
        }
        if let Err(err) = self.persist() {
            tracing::warn!(key, error = %format!("{err:#}"), "failed to persist preference");
        }
    }
}

fn load_store_file(path: &Path) -> anyhow::Result<Option<StoreFile>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("read {}", path.display())),
    };
    let file: StoreFile =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;
    if file.version != STORE_FILE_VERSION {
        anyhow::bail!("unsupported store version {}", file.version);
    }
    Ok(Some(file))
}
