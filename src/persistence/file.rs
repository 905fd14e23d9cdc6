//! File-backed slots.

use super::PersistenceAdapter;
use crate::codec::Encoding;
use crate::error::PersistenceError;
use crate::types::Entity;
use fs2::FileExt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Name of the advisory lock file inside the storage directory.
const LOCK_FILE: &str = "LOCK";

/// File storage configuration.
#[derive(Clone, Debug)]
pub struct FileAdapterConfig {
    /// Directory holding one file per slot.
    pub dir: PathBuf,

    /// Encoding of the slot files (decides the file extension).
    pub encoding: Encoding,

    /// Whether to create the directory if it doesn't exist.
    pub create_if_missing: bool,
}

impl Default for FileAdapterConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./keepsake"),
            encoding: Encoding::Json,
            create_if_missing: true,
        }
    }
}

/// A directory of slot files, exclusively locked for this process.
pub struct FileStorage {
    config: FileAdapterConfig,

    /// Lock file for exclusive access; shared with every slot handed out.
    lock_file: Arc<File>,
}

impl FileStorage {
    /// Open (and lock) the storage directory.
    pub fn open(config: FileAdapterConfig) -> Result<Self, PersistenceError> {
        if !config.dir.exists() {
            if !config.create_if_missing {
                return Err(PersistenceError::Unavailable(format!(
                    "storage directory {} does not exist",
                    config.dir.display()
                )));
            }
            fs::create_dir_all(&config.dir)?;
        }

        let lock_file = Self::acquire_lock(&config.dir)?;
        tracing::debug!(dir = %config.dir.display(), "opened file storage");

        Ok(Self {
            config,
            lock_file: Arc::new(lock_file),
        })
    }

    /// Encoding the slot files are written in.
    pub fn encoding(&self) -> Encoding {
        self.config.encoding
    }

    /// Storage directory.
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Slot named `key`.
    pub fn slot(&self, key: &str) -> FileSlot {
        let file_name = format!("{}.{}", key, self.config.encoding.extension());
        FileSlot {
            path: self.config.dir.join(file_name),
            _lock: Arc::clone(&self.lock_file),
        }
    }

    /// Slot for an entity's collection.
    pub fn slot_for<T: Entity>(&self) -> FileSlot {
        self.slot(T::KEY)
    }

    fn acquire_lock(dir: &Path) -> Result<File, PersistenceError> {
        let lock_file = File::create(dir.join(LOCK_FILE))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| PersistenceError::Locked)?;

        Ok(lock_file)
    }
}

/// One slot file. Keeps the storage directory locked while alive.
pub struct FileSlot {
    path: PathBuf,
    _lock: Arc<File>,
}

impl FileSlot {
    /// Path of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl PersistenceAdapter for FileSlot {
    fn load(&self) -> Result<Option<Vec<u8>>, PersistenceError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, bytes: &[u8]) -> Result<(), PersistenceError> {
        // Write beside the target so the rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(self.parent())?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        // Make the rename itself durable. Not every platform lets us open a directory.
        if let Ok(dir) = File::open(self.parent()) {
            let _ = dir.sync_all();
        }

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "slot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> FileAdapterConfig {
        FileAdapterConfig {
            dir: dir.path().join("data"),
            encoding: Encoding::Json,
            create_if_missing: true,
        }
    }

    #[test]
    fn test_missing_slot_loads_none() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(test_config(&dir)).unwrap();
        assert!(storage.slot("trips").load().unwrap().is_none());
    }

    #[test]
    fn test_save_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(test_config(&dir)).unwrap();
        let slot = storage.slot("trips");

        slot.save(b"[1,2,3]").unwrap();
        slot.save(b"[]").unwrap();

        assert_eq!(slot.load().unwrap().unwrap(), b"[]");
        assert_eq!(slot.path(), dir.path().join("data").join("trips.json"));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::open(test_config(&dir)).unwrap();
        storage.slot("notes").save(b"[]").unwrap();

        let mut names: Vec<String> = fs::read_dir(storage.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["LOCK".to_string(), "notes.json".to_string()]);
    }

    #[test]
    fn test_directory_lock() {
        let dir = TempDir::new().unwrap();
        let _storage = FileStorage::open(test_config(&dir)).unwrap();

        let second = FileStorage::open(test_config(&dir));
        assert!(matches!(second, Err(PersistenceError::Locked)));
    }

    #[test]
    fn test_missing_directory_without_create() {
        let dir = TempDir::new().unwrap();
        let config = FileAdapterConfig {
            create_if_missing: false,
            ..test_config(&dir)
        };
        assert!(matches!(
            FileStorage::open(config),
            Err(PersistenceError::Unavailable(_))
        ));
    }

    #[test]
    fn test_messagepack_extension() {
        let dir = TempDir::new().unwrap();
        let config = FileAdapterConfig {
            encoding: Encoding::MessagePack,
            ..test_config(&dir)
        };
        let storage = FileStorage::open(config).unwrap();
        assert!(storage
            .slot("scents")
            .path()
            .ends_with("scents.msgpack"));
    }
}
