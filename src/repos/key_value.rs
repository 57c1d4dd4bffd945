//! Local key-value persistence behind the guest cart and other
//! browser-profile-scoped state. Implementations swap freely - call sites
//! only see `get`/`set`/`remove` over string keys.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde_json;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "key value store error - io failure: {}", _0)]
    Io(String),
    #[fail(display = "key value store error - corrupt storage: {}", _0)]
    Corrupt(String),
}

pub trait KeyValueStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    fn set(&self, key: &str, value: String) -> Result<(), Error>;
    fn remove(&self, key: &str) -> Result<(), Error>;
}

/// Single-file JSON store. Operations read-modify-write the whole file
/// under an in-process lock; concurrent processes are not guarded.
pub struct FileKeyValueStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> Result<HashMap<String, String>, Error> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(ref e) if e.kind() == IoErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(Error::Io(format!("{}", e))),
        };

        if raw.is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&raw).map_err(|e| Error::Corrupt(format!("{}", e)))
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Io(format!("{}", e)))?;
        }
        let raw = serde_json::to_string(map).map_err(|e| Error::Corrupt(format!("{}", e)))?;
        fs::write(&self.path, raw).map_err(|e| Error::Io(format!("{}", e)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let _guard = self.lock.lock().expect("FileKeyValueStore: poisoned mutex at get");
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), Error> {
        let _guard = self.lock.lock().expect("FileKeyValueStore: poisoned mutex at set");
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(Error::Corrupt(reason)) => {
                warn!("Resetting corrupt key value storage: {}", reason);
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_string(), value);
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let _guard = self.lock.lock().expect("FileKeyValueStore: poisoned mutex at remove");
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(Error::Corrupt(_)) => HashMap::new(),
            Err(e) => return Err(e),
        };
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// In-memory implementation for tests and ephemeral sessions.
#[derive(Clone, Default)]
pub struct MemoryKeyValueStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let inner = self.inner.lock().expect("MemoryKeyValueStore: poisoned mutex at get");
        Ok(inner.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), Error> {
        let mut inner = self.inner.lock().expect("MemoryKeyValueStore: poisoned mutex at set");
        inner.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let mut inner = self.inner.lock().expect("MemoryKeyValueStore: poisoned mutex at remove");
        inner.remove(key);
        Ok(())
    }
}
