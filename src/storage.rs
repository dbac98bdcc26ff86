//! Best-effort key-value state: sequence counters and the last form snapshot.
//!
//! Callers never see storage errors. A [`FileStore`] keeps an in-memory mirror
//! and keeps serving from it when the backing file cannot be written.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

pub const SPK_SEQ_KEY: &str = "spk_seq";
pub const INV_SEQ_KEY: &str = "inv_seq";
pub const FORM_KEY: &str = "spk_form";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// Monotonic counters on top of any key-value store.
pub trait CounterStore {
    /// Last issued value, 0 if none.
    fn current(&self, key: &str) -> u64;
    /// Increment and persist, returning the new value.
    fn next(&mut self, key: &str) -> u64;
}

impl<S: KeyValueStore + ?Sized> CounterStore for S {
    fn current(&self, key: &str) -> u64 {
        let Some(raw) = self.get(key) else {
            return 0;
        };
        match raw.trim().parse::<u64>() {
            Ok(value) => value,
            Err(e) => {
                log::warn!("counter {} holds {:?} ({}); counting from 0", key, raw, e);
                0
            }
        }
    }

    fn next(&mut self, key: &str) -> u64 {
        let current = self.current(key);
        let value = match current.checked_add(1) {
            Some(value) => value,
            None => {
                log::warn!("counter {} is exhausted at {}", key, current);
                current
            }
        };
        self.set(key, &value.to_string());
        value
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// JSON object file mirrored in memory.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    memory: MemoryStore,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        FileStore {
            path,
            memory: MemoryStore { entries },
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        let result = serde_json::to_string_pretty(&self.memory.entries)
            .map_err(std::io::Error::other)
            .and_then(|json| fs::write(&self.path, json));
        if let Err(e) = result {
            log::warn!("state not persisted to {}: {}", self.path.display(), e);
        }
    }
}

/// Top-level scalars are kept as their JSON text, so `{"spk_seq": 5}` still
/// reads as counter 5. Anything that is not a JSON object is copied to
/// `<path>.bak` before the first write replaces it.
fn read_entries(path: &Path) -> BTreeMap<String, String> {
    let Ok(content) = fs::read_to_string(path) else {
        return BTreeMap::new();
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect(),
        Ok(_) => {
            backup(path, "not a JSON object");
            BTreeMap::new()
        }
        Err(e) => {
            backup(path, &e.to_string());
            BTreeMap::new()
        }
    }
}

fn backup(path: &Path, reason: &str) {
    let backup_path = backup_path(path);
    match fs::copy(path, &backup_path) {
        Ok(_) => log::warn!(
            "ignoring unreadable state file {} ({}); copy kept at {}",
            path.display(),
            reason,
            backup_path.display()
        ),
        Err(e) => log::warn!(
            "ignoring unreadable state file {} ({}); backup failed: {}",
            path.display(),
            reason,
            e
        ),
    }
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.memory.get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.memory.set(key, value);
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        self.memory.remove(key);
        self.flush();
    }
}

/// Pick the store once at startup: file-backed when the path is writable,
/// memory-only otherwise.
pub fn open_store(path: Option<&Path>) -> Box<dyn KeyValueStore> {
    match path {
        Some(p) if is_writable(p) => {
            log::debug!("using state file {}", p.display());
            Box::new(FileStore::open(p))
        }
        Some(p) => {
            log::warn!("state file {} is not writable; keeping state in memory", p.display());
            Box::new(MemoryStore::new())
        }
        None => Box::new(MemoryStore::new()),
    }
}

fn is_writable(path: &Path) -> bool {
    if path.is_dir() {
        return false;
    }
    if path.exists() {
        return fs::OpenOptions::new().append(true).open(path).is_ok();
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let probe = parent.join(format!(".spk-probe-{}", std::process::id()));
    let ok = fs::write(&probe, b"1").is_ok();
    let _ = fs::remove_file(&probe);
    ok
}
