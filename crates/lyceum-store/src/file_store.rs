use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use lyceum_core::{DurableStore, LyceumError};

/// File-system backed implementation of [`DurableStore`].
///
/// Layout: key segments split on `::` become directories, the final
/// segment becomes `{segment}.json` — so `lyceum::chat::messages` lands at
/// `{root}/lyceum/chat/messages.json`. Key segments are trusted to be
/// path-safe by the prefixing convention.
pub struct FileStore {
    root: PathBuf,
    capacity_bytes: Option<u64>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            capacity_bytes: None,
        }
    }

    /// Cap total stored value bytes at `capacity_bytes`.
    pub fn with_capacity(mut self, capacity_bytes: u64) -> Self {
        self.capacity_bytes = Some(capacity_bytes);
        self
    }

    fn path_of(&self, key: &str) -> PathBuf {
        let mut path = self.root.clone();
        let mut segments = key.split("::").peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{segment}.json"));
            }
        }
        path
    }

    fn total_bytes_excluding(&self, key: &str) -> u64 {
        self.keys()
            .into_iter()
            .filter(|k| k.as_str() != key)
            .map(|k| self.size_of(&k))
            .sum()
    }
}

impl DurableStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, LyceumError> {
        let path = self.path_of(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LyceumError::Store(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), LyceumError> {
        if let Some(capacity) = self.capacity_bytes {
            let projected = self.total_bytes_excluding(key) + value.len() as u64;
            if projected > capacity {
                return Err(LyceumError::QuotaExceeded(format!(
                    "writing {} bytes to {key} would use {projected} of {capacity} bytes",
                    value.len()
                )));
            }
        }

        let path = self.path_of(key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                LyceumError::Store(format!("failed to create dir {}: {}", dir.display(), e))
            })?;
        }
        fs::write(&path, value).map_err(|e| {
            LyceumError::Store(format!("failed to write {}: {}", path.display(), e))
        })
    }

    fn remove(&self, key: &str) -> Result<(), LyceumError> {
        let path = self.path_of(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LyceumError::Store(format!(
                "failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn size_of(&self, key: &str) -> u64 {
        fs::metadata(self.path_of(key)).map(|m| m.len()).unwrap_or(0)
    }

    fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if self.root.is_dir() {
            collect_keys(&self.root, &[], &mut keys);
        }
        keys
    }
}

/// Recursively collect keys, rebuilding `::`-joined names from the
/// directory layout. Enumeration is best effort by contract: an unreadable
/// directory is logged and skipped.
fn collect_keys(dir: &Path, prefix: &[String], out: &mut Vec<String>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("skipping unreadable dir {}: {}", dir.display(), e);
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_dir() {
            let mut nested = prefix.to_vec();
            nested.push(name.to_string());
            collect_keys(&path, &nested, out);
        } else if let Some(stem) = name.strip_suffix(".json") {
            let mut segments = prefix.to_vec();
            segments.push(stem.to_string());
            out.push(segments.join("::"));
        }
    }
}
