//! Timestamped catalog backups.
//!
//! # Responsibility
//! - Write point-in-time copies of the catalog next to (not over) the
//!   primary document.
//! - List and read existing backups for restore.
//!
//! # Invariants
//! - Backup file names embed a sortable `YYYYMMDD_HHMMSS` timestamp.
//! - An existing backup is never overwritten; same-second backups get a
//!   numeric suffix.
//! - Backups use the catalog document schema.

use super::document::{read_json, FileDocument};
use super::{PersistResult, PersistenceError};
use crate::model::product::Product;
use chrono::NaiveDateTime;
use log::{error, info};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const BACKUP_PREFIX: &str = "inventory_backup_";
const BACKUP_EXTENSION: &str = "json";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const MAX_SAME_SECOND_BACKUPS: u32 = 1000;

/// Writes `products` to a new backup file inside `dir`.
///
/// Returns the path of the created file.
///
/// # Errors
/// - `Encode` when serialization fails.
/// - `Write` when the directory cannot be created, every candidate name is
///   taken, or the file cannot be written.
pub fn write_backup(
    dir: &Path,
    products: &[Product],
    taken_at: NaiveDateTime,
) -> PersistResult<PathBuf> {
    let stamp = taken_at.format(TIMESTAMP_FORMAT).to_string();
    let location = dir.display().to_string();

    let bytes = serde_json::to_vec_pretty(products).map_err(|source| PersistenceError::Encode {
        location: location.clone(),
        source,
    })?;

    let outcome = std::fs::create_dir_all(dir)
        .and_then(|()| create_unique(dir, &stamp, &bytes))
        .map_err(|source| PersistenceError::Write {
            location: location.clone(),
            source,
        });

    match &outcome {
        Ok(path) => info!(
            "event=backup_write module=store status=ok path={} count={}",
            path.display(),
            products.len()
        ),
        Err(err) => error!(
            "event=backup_write module=store status=error dir={location} error_code={} error={}",
            err.code(),
            err
        ),
    }

    outcome
}

/// Lists backup files in `dir`, oldest first.
///
/// A missing directory yields an empty list.
pub fn list_backups(dir: &Path) -> PersistResult<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(PersistenceError::Read {
                location: dir.display().to_string(),
                source,
            })
        }
    };

    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PersistenceError::Read {
            location: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if let Some(order) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(backup_order)
        {
            backups.push((order, path));
        }
    }

    backups.sort();
    Ok(backups.into_iter().map(|(_, path)| path).collect())
}

/// Reads the products stored in one backup file.
pub fn read_backup(path: &Path) -> PersistResult<Vec<Product>> {
    let document = FileDocument::new(path);
    read_json::<Vec<Product>, _>(&document, "backup_read")?.ok_or_else(|| PersistenceError::Read {
        location: path.display().to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "backup file not found"),
    })
}

fn create_unique(dir: &Path, stamp: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    for attempt in 0..MAX_SAME_SECOND_BACKUPS {
        let path = dir.join(backup_file_name(stamp, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(bytes)?;
                file.flush()?;
                return Ok(path);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("too many backups for timestamp {stamp}"),
    ))
}

fn backup_file_name(stamp: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{BACKUP_PREFIX}{stamp}.{BACKUP_EXTENSION}")
    } else {
        format!("{BACKUP_PREFIX}{stamp}_{attempt}.{BACKUP_EXTENSION}")
    }
}

/// Sort key `(timestamp, suffix)` for a backup file name.
fn backup_order(file_name: &str) -> Option<(String, u32)> {
    let stem = file_name
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(BACKUP_EXTENSION)?
        .strip_suffix('.')?;

    // `YYYYMMDD_HHMMSS` is 15 chars; anything after is `_<n>`.
    if stem.len() < 15 || !stem.is_char_boundary(15) {
        return None;
    }
    let (stamp, rest) = stem.split_at(15);
    let well_formed = stamp
        .char_indices()
        .all(|(index, ch)| if index == 8 { ch == '_' } else { ch.is_ascii_digit() });
    if !well_formed {
        return None;
    }
    let suffix = match rest.strip_prefix('_') {
        Some(number) => number.parse().ok()?,
        None if rest.is_empty() => 0,
        None => return None,
    };
    Some((stamp.to_string(), suffix))
}
