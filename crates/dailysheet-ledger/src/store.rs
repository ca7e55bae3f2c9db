use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use dailysheet_core::Workbook;
use tempfile::NamedTempFile;

use crate::error::StoreError;

/// Where the ledger document lives between calls.
///
/// Every ledger operation loads the whole document, works on the in-memory
/// copy and, for write paths, persists the whole document back.
pub trait DocumentStore: Send + Sync {
    /// Load the current document
    fn load(&self) -> Result<Workbook, StoreError>;

    /// Replace the stored document
    fn persist(&self, workbook: &Workbook) -> Result<(), StoreError>;

    /// Raw bytes of the stored document, or `None` if nothing is stored yet
    fn raw_bytes(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Check whether a document is stored
    fn exists(&self) -> bool {
        matches!(self.raw_bytes(), Ok(Some(_)))
    }

    /// Human-readable location, used in logs
    fn location(&self) -> String;
}

/// Workbook persisted as a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parent_dir(&self) -> &Path {
        // `Path::parent` is `Some("")` for bare file names
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<Workbook, StoreError> {
        let bytes = self
            .raw_bytes()?
            .ok_or_else(|| StoreError::Missing(self.path.clone()))?;
        Ok(Workbook::from_slice(&bytes)?)
    }

    /// Writes to a temp file next to the target, then renames it into place,
    /// so concurrent readers never observe a half-written document.
    fn persist(&self, workbook: &Workbook) -> Result<(), StoreError> {
        let json = workbook.to_json_pretty()?;
        let dir = self.parent_dir();
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file_mut().flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!("Persisted {} ({} bytes)", self.path.display(), json.len());
        Ok(())
    }

    fn raw_bytes(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Document kept in memory as serialized JSON bytes
#[derive(Debug, Default)]
pub struct MemoryStore {
    bytes: Mutex<Option<Vec<u8>>>,
    persist_count: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `workbook`
    pub fn with_workbook(workbook: &Workbook) -> Result<Self, StoreError> {
        let bytes = workbook.to_json()?.into_bytes();
        Ok(Self {
            bytes: Mutex::new(Some(bytes)),
            persist_count: AtomicUsize::new(0),
        })
    }

    /// Number of successful `persist` calls since creation
    pub fn persist_count(&self) -> usize {
        self.persist_count.load(Ordering::SeqCst)
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Workbook, StoreError> {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        match bytes.as_deref() {
            Some(bytes) => Ok(Workbook::from_slice(bytes)?),
            None => Err(StoreError::Missing(PathBuf::from(self.location()))),
        }
    }

    fn persist(&self, workbook: &Workbook) -> Result<(), StoreError> {
        let json = workbook.to_json()?.into_bytes();
        *self.bytes.lock().unwrap_or_else(PoisonError::into_inner) = Some(json);
        self.persist_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn raw_bytes(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
