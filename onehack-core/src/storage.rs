//! Key-value persistence for the local bookmark cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{OneHackError, OneHackResult};

/// String slots addressed by name.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> OneHackResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> OneHackResult<()>;

    fn remove(&self, key: &str) -> OneHackResult<()>;
}

/// One `<key>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for_key(&self, key: &str) -> PathBuf {
        let key_slug = key.replace(['/', '\\', ':'], "_");
        self.dir.join(format!("{}.json", key_slug))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> OneHackResult<Option<String>> {
        let path = self.path_for_key(key);

        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(OneHackError::Storage(format!(
                "Could not read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> OneHackResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            OneHackError::Storage(format!("Could not create {}: {e}", self.dir.display()))
        })?;

        let path = self.path_for_key(key);
        let tmp_path = path.with_extension("json.tmp");

        // Write then rename so readers never see a half-written list
        std::fs::write(&tmp_path, value)
            .and_then(|_| std::fs::rename(&tmp_path, &path))
            .map_err(|e| {
                OneHackError::Storage(format!("Could not write {}: {e}", path.display()))
            })
    }

    fn remove(&self, key: &str) -> OneHackResult<()> {
        let path = self.path_for_key(key);

        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(OneHackError::Storage(format!(
                "Could not remove {}: {e}",
                path.display()
            ))),
        }
    }
}

/// In-memory slots.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn slots(&self) -> OneHackResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| OneHackError::Storage("Memory store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> OneHackResult<Option<String>> {
        Ok(self.slots()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> OneHackResult<()> {
        self.slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> OneHackResult<()> {
        self.slots()?.remove(key);
        Ok(())
    }
}
