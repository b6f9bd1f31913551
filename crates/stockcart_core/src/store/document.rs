//! Persistence seam for whole-document storage.
//!
//! # Responsibility
//! - Abstract "read all bytes / replace all bytes" over files and memory.
//! - Provide JSON encode/decode helpers with uniform logging.
//!
//! # Invariants
//! - `read` returns `Ok(None)` for an absent document; absence is not an
//!   error.
//! - `write` replaces the full document content.

use super::{PersistResult, PersistenceError};
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
#[cfg(any(test, feature = "test-util"))]
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Whole-document storage backend.
pub trait Document {
    /// Human-readable location used in errors and logs.
    fn location(&self) -> String;
    /// Reads the full document, or `None` when it does not exist.
    fn read(&self) -> PersistResult<Option<Vec<u8>>>;
    /// Replaces the full document.
    fn write(&self, bytes: &[u8]) -> PersistResult<()>;
}

/// File-backed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Document for FileDocument {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> PersistResult<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Read {
                location: self.location(),
                source,
            }),
        }
    }

    fn write(&self, bytes: &[u8]) -> PersistResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Write {
                    location: self.location(),
                    source,
                })?;
            }
        }

        std::fs::write(&self.path, bytes).map_err(|source| PersistenceError::Write {
            location: self.location(),
            source,
        })
    }
}

#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
struct MemoryState {
    contents: Option<Vec<u8>>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// In-memory document with failure injection, for tests only.
///
/// Clones share the same underlying buffer, so a test can keep a handle
/// while a store owns another.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    label: String,
    state: Arc<Mutex<MemoryState>>,
}

#[cfg(any(test, feature = "test-util"))]
impl MemoryDocument {
    /// Creates an absent document.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    /// Creates a document with initial content.
    pub fn with_contents(label: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        let document = Self::new(label);
        document.lock().contents = Some(contents.into());
        document
    }

    /// Returns a copy of the current content.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.lock().contents.clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Makes subsequent reads fail with an I/O error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Makes subsequent writes fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Document for MemoryDocument {
    fn location(&self) -> String {
        format!("memory:{}", self.label)
    }

    fn read(&self) -> PersistResult<Option<Vec<u8>>> {
        let state = self.lock();
        if state.fail_reads {
            return Err(PersistenceError::Read {
                location: self.location(),
                source: io::Error::other("injected read failure"),
            });
        }
        Ok(state.contents.clone())
    }

    fn write(&self, bytes: &[u8]) -> PersistResult<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(PersistenceError::Write {
                location: self.location(),
                source: io::Error::other("injected write failure"),
            });
        }
        state.contents = Some(bytes.to_vec());
        state.writes += 1;
        Ok(())
    }
}

/// Reads and decodes a JSON document.
///
/// Returns `Ok(None)` when the document is absent.
///
/// # Side effects
/// - Emits `<event>` logging lines with duration and status.
pub(crate) fn read_json<T, D>(document: &D, event: &str) -> PersistResult<Option<T>>
where
    T: DeserializeOwned,
    D: Document + ?Sized,
{
    let started_at = Instant::now();
    let location = document.location();
    debug!("event={event} module=store status=start location={location}");

    let outcome = document.read().and_then(|bytes| match bytes {
        Some(bytes) => serde_json::from_slice::<T>(&bytes)
            .map(Some)
            .map_err(|source| PersistenceError::Parse {
                location: location.clone(),
                source,
            }),
        None => Ok(None),
    });

    match &outcome {
        Ok(Some(_)) => info!(
            "event={event} module=store status=ok location={location} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Ok(None) => info!(
            "event={event} module=store status=absent location={location} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event={event} module=store status=error location={location} duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }

    outcome
}

/// Encodes a value as pretty-printed JSON and replaces the document.
///
/// # Side effects
/// - Emits `<event>` logging lines with duration and status.
pub(crate) fn write_json<T, D>(document: &D, value: &T, event: &str) -> PersistResult<()>
where
    T: Serialize + ?Sized,
    D: Document + ?Sized,
{
    let started_at = Instant::now();
    let location = document.location();

    let outcome = serde_json::to_vec_pretty(value)
        .map_err(|source| PersistenceError::Encode {
            location: location.clone(),
            source,
        })
        .and_then(|bytes| document.write(&bytes));

    match &outcome {
        Ok(()) => info!(
            "event={event} module=store status=ok location={location} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event={event} module=store status=error location={location} duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::{read_json, write_json, Document, FileDocument, MemoryDocument};
    use crate::store::PersistenceError;
    use std::collections::BTreeMap;

    #[test]
    fn absent_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let document = FileDocument::new(dir.path().join("missing.json"));
        assert!(document.read().unwrap().is_none());
    }

    #[test]
    fn file_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let document = FileDocument::new(dir.path().join("nested/data/cart.json"));
        let value = BTreeMap::from([("A1_Widget".to_string(), 2_u32)]);

        write_json(&document, &value, "test_write").unwrap();
        let loaded: BTreeMap<String, u32> = read_json(&document, "test_read").unwrap().unwrap();
        assert_eq!(loaded, value);
    }

    #[test]
    fn memory_document_injects_failures() {
        let document = MemoryDocument::with_contents("cart", "{}");
        document.set_fail_writes(true);
        let err = write_json(&document, &Vec::<u32>::new(), "test_write").unwrap_err();
        assert!(matches!(err, PersistenceError::Write { .. }));
        assert_eq!(document.contents().as_deref(), Some(&b"{}"[..]));

        document.set_fail_reads(true);
        let err = read_json::<Vec<u32>, _>(&document, "test_read").unwrap_err();
        assert!(matches!(err, PersistenceError::Read { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let document = MemoryDocument::with_contents("catalog", "[{not json");
        let err = read_json::<Vec<u32>, _>(&document, "test_read").unwrap_err();
        assert!(matches!(err, PersistenceError::Parse { .. }));
        assert_eq!(err.location(), "memory:catalog");
    }
}
