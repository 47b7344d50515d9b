//! Save backups with hash tracking.
//!
//! Before a save is overwritten, a copy is kept next to it as `<name>.dat.bak`
//! along with `<name>.dat.bak.json` recording two SHA-256 hashes: the file as
//! it was backed up and the file as this tool last wrote it. A fresh backup
//! is only taken when the save on disk matches neither, meaning it came from
//! the game or the user rather than from an earlier edit.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMetadata {
    /// Hash of the save when it was copied to the backup
    pub original_hash: String,

    /// Hash of the save after our most recent write
    pub last_edit_hash: String,
}

impl BackupMetadata {
    fn new(hash: String) -> Self {
        BackupMetadata {
            original_hash: hash.clone(),
            last_edit_hash: hash,
        }
    }

    fn tracks(&self, hash: &str) -> bool {
        self.original_hash == hash || self.last_edit_hash == hash
    }
}

/// Backup and metadata paths for a save file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupPaths {
    pub backup: PathBuf,
    pub metadata: PathBuf,
}

impl BackupPaths {
    pub fn for_save(save_path: &Path) -> Self {
        let mut backup = save_path.as_os_str().to_owned();
        backup.push(".bak");
        let mut metadata = backup.clone();
        metadata.push(".json");
        BackupPaths {
            backup: PathBuf::from(backup),
            metadata: PathBuf::from(metadata),
        }
    }

    fn read_metadata(&self) -> Result<Option<BackupMetadata>, BackupError> {
        if !self.metadata.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.metadata)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn write_metadata(&self, metadata: &BackupMetadata) -> Result<(), BackupError> {
        fs::write(&self.metadata, serde_json::to_string_pretty(metadata)?)?;
        Ok(())
    }
}

/// Hex SHA-256 of a file's contents
pub fn hash_file(path: &Path) -> Result<String, BackupError> {
    let data = fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&data)))
}

/// Back up `save_path` unless the current file is already accounted for
///
/// Returns true if a new backup was written. An existing backup without
/// metadata is never overwritten.
pub fn smart_backup(save_path: &Path) -> Result<bool, BackupError> {
    let paths = BackupPaths::for_save(save_path);

    if paths.backup.exists() {
        let Some(metadata) = paths.read_metadata()? else {
            tracing::warn!(backup = %paths.backup.display(), "backup has no metadata, leaving it alone");
            return Ok(false);
        };
        if metadata.tracks(&hash_file(save_path)?) {
            return Ok(false);
        }
    }

    fs::copy(save_path, &paths.backup)?;
    paths.write_metadata(&BackupMetadata::new(hash_file(save_path)?))?;
    tracing::debug!(backup = %paths.backup.display(), "created backup");
    Ok(true)
}

/// Record the save's new hash after we have written it
pub fn update_after_edit(save_path: &Path) -> Result<(), BackupError> {
    let paths = BackupPaths::for_save(save_path);
    let hash = hash_file(save_path)?;

    let metadata = match paths.read_metadata()? {
        Some(mut metadata) => {
            metadata.last_edit_hash = hash;
            metadata
        }
        None => BackupMetadata::new(hash),
    };
    paths.write_metadata(&metadata)
}
