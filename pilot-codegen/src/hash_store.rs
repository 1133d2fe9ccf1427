//! Hash store: SHA-256 tracking of generated files.
//!
//! Persists a [`HashStoreFile`] JSON document at `<root>/.pilot/hashes.json`,
//! keyed by `/`-separated paths relative to the output root. Saves use a
//! `.tmp` sibling and a rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{io_err, CodegenError};

/// Relative path → SHA-256 hex digest of the last generated content.
pub type HashStore = BTreeMap<String, String>;

/// On-disk hash store payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashStoreFile {
    pub generated_at: DateTime<Utc>,
    pub files: HashStore,
}

impl HashStoreFile {
    fn empty() -> Self {
        HashStoreFile {
            generated_at: Utc::now(),
            files: HashStore::new(),
        }
    }
}

/// `<root>/.pilot/hashes.json`
pub fn store_path_at(root: &Path) -> PathBuf {
    root.join(".pilot").join("hashes.json")
}

/// Load the hash store under `root`; empty if none was saved yet.
pub fn load_at(root: &Path) -> Result<HashStoreFile, CodegenError> {
    let path = store_path_at(root);
    if !path.exists() {
        return Ok(HashStoreFile::empty());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Save the hash store under `root` atomically.
pub fn save_at(root: &Path, store: &HashStoreFile) -> Result<(), CodegenError> {
    let path = store_path_at(root);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid hash store path")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(store)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

/// SHA-256 hex digest of `content`.
pub fn digest(content: &str) -> String {
    let mut h = Sha256::new();
    h.update(content.as_bytes());
    hex::encode(h.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_store_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let store = load_at(tmp.path()).unwrap();
        assert!(store.files.is_empty());
    }

    #[test]
    fn roundtrip_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut files = HashStore::new();
        files.insert("main.go".to_string(), "deadbeef".to_string());
        files.insert("pkg/config/config.go".to_string(), "cafebabe".to_string());
        let store = HashStoreFile {
            generated_at: Utc::now(),
            files,
        };

        save_at(tmp.path(), &store).unwrap();
        assert_eq!(load_at(tmp.path()).unwrap(), store);
        assert!(!store_path_at(tmp.path()).with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_store_is_json_error() {
        let tmp = TempDir::new().unwrap();
        let path = store_path_at(tmp.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_at(tmp.path()), Err(CodegenError::Json(_))));
    }

    #[test]
    fn digest_is_hex_sha256() {
        assert_eq!(
            digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
