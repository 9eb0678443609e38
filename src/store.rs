//! Seed persistence behind a narrow interface, so provisioning and TOTP
//! never depend on a storage medium.
//!
//! Implementations must replace atomically: a reader sees the whole old
//! seed or the whole new one.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;
use zeroize::Zeroizing;

use crate::{errors::PkiError, types::Seed};

pub trait SeedStore {
    /// Current seed, or `None` if none has been provisioned.
    ///
    /// # Errors
    /// Returns `PkiError` if the backing medium fails or holds an invalid seed.
    fn get_seed(&self) -> Result<Option<Seed>, PkiError>;

    /// Replace the stored seed.
    ///
    /// # Errors
    /// Returns `PkiError` if the backing medium fails.
    fn put_seed(&self, seed: &Seed) -> Result<(), PkiError>;
}

/// In-process store, mainly for tests and embedding.
#[derive(Default)]
pub struct MemorySeedStore {
    seed: RwLock<Option<Seed>>,
}

impl MemorySeedStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeedStore for MemorySeedStore {
    fn get_seed(&self) -> Result<Option<Seed>, PkiError> {
        let guard = self.seed.read().map_err(|_| io::Error::other("seed store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn put_seed(&self, seed: &Seed) -> Result<(), PkiError> {
        let mut guard = self.seed.write().map_err(|_| io::Error::other("seed store lock poisoned"))?;
        *guard = Some(seed.clone());
        Ok(())
    }
}

/// Seed kept as a single line of hex in a file.
pub struct FileSeedStore {
    path: PathBuf,
}

impl FileSeedStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl SeedStore for FileSeedStore {
    fn get_seed(&self) -> Result<Option<Seed>, PkiError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => Zeroizing::new(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Seed::parse(text.trim()).map(Some)
    }

    fn put_seed(&self, seed: &Seed) -> Result<(), PkiError> {
        let dir = self.dir();
        fs::create_dir_all(dir)?;
        // Uniquely named per writer; removed on drop if anything below fails.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(seed.as_str().as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        tracing::info!(path = %self.path.display(), "Seed stored");
        Ok(())
    }
}
