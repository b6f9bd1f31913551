//! JSON document persistence for the catalog and cart stores.
//!
//! # Responsibility
//! - Own the two record stores and their write-through persistence.
//! - Keep file/serialization details behind the `Document` seam.
//!
//! # Invariants
//! - Every mutation is followed by a full rewrite of the owning document.
//! - Persistence failures are reported to the caller and never revert or
//!   poison in-memory state.
//! - Load failures are never fatal: the catalog self-heals to defaults and
//!   the cart falls back to empty.
//!
//! # See also
//! - `crate::service::inventory_service` for the call boundary.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

pub mod backup;
pub mod cart_store;
pub mod catalog_store;
pub mod document;

pub type PersistResult<T> = Result<T, PersistenceError>;

/// Failure to read, write, or (de)serialize a persisted document.
#[derive(Debug)]
pub enum PersistenceError {
    Read {
        location: String,
        source: io::Error,
    },
    Write {
        location: String,
        source: io::Error,
    },
    Parse {
        location: String,
        source: serde_json::Error,
    },
    Encode {
        location: String,
        source: serde_json::Error,
    },
}

impl PersistenceError {
    /// Document location (path or in-memory label) the failure refers to.
    pub fn location(&self) -> &str {
        match self {
            Self::Read { location, .. }
            | Self::Write { location, .. }
            | Self::Parse { location, .. }
            | Self::Encode { location, .. } => location.as_str(),
        }
    }

    /// Stable machine-readable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read_failed",
            Self::Write { .. } => "write_failed",
            Self::Parse { .. } => "parse_failed",
            Self::Encode { .. } => "encode_failed",
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { location, source } => write!(f, "error reading `{location}`: {source}"),
            Self::Write { location, source } => write!(f, "error saving `{location}`: {source}"),
            Self::Parse { location, source } => {
                write!(f, "error parsing `{location}`: {source}")
            }
            Self::Encode { location, source } => {
                write!(f, "error encoding `{location}`: {source}")
            }
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
            Self::Parse { source, .. } | Self::Encode { source, .. } => Some(source),
        }
    }
}

/// Result of a non-fatal load: the usable store plus anything worth telling
/// the operator about.
#[derive(Debug)]
pub struct Loaded<T> {
    pub store: T,
    /// Problems encountered while loading or self-healing. Empty on a clean
    /// load.
    pub notices: Vec<PersistenceError>,
}

impl<T> Loaded<T> {
    pub fn clean(store: T) -> Self {
        Self {
            store,
            notices: Vec::new(),
        }
    }
}
