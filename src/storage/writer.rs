//! Append-only writer with fsync on every record
//!
//! Records are never updated in place. A later record for the same id
//! supersedes the earlier one and a tombstone removes it from the live index.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::errors::{StorageError, StorageResult};
use super::reader::StorageReader;
use super::record::DocumentRecord;

/// Owns `documents.dat` and the in-memory index of live document offsets.
///
/// The index is rebuilt from a full scan on open and kept current on every
/// append, so point lookups never scan.
pub struct StorageWriter {
    storage_path: PathBuf,
    file: File,
    current_offset: u64,
    /// composite document_id -> offset of its latest live record
    live_offsets: HashMap<String, u64>,
}

impl StorageWriter {
    /// Opens or creates `<data_dir>/data/documents.dat`, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// `USERS_STORAGE_IO_ERROR` if the directory cannot be created,
    /// `USERS_STORAGE_WRITE_FAILED` if the file cannot be opened, and
    /// `USERS_DATA_CORRUPTION` if an existing file fails verification.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let storage_path = super::storage_file(data_dir);

        if let Some(parent) = storage_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::io_error(
                    format!("Failed to create data directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&storage_path)
            .map_err(|e| {
                StorageError::write_failed(
                    format!("Failed to open storage file: {}", storage_path.display()),
                    e,
                )
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::io_error("Failed to read file metadata", e))?
            .len();

        let live_offsets = if current_offset == 0 {
            HashMap::new()
        } else {
            StorageReader::open(&storage_path)?
                .build_live_index()?
                .offsets
        };

        Ok(Self {
            storage_path,
            file,
            current_offset,
            live_offsets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Number of live (not deleted) documents.
    pub fn document_count(&self) -> usize {
        self.live_offsets.len()
    }

    /// Appends `record` and fsyncs. Returns the offset it was written at.
    ///
    /// The index is only touched once the record is durable. On a failed
    /// write or fsync the file is cut back to the last durable record.
    pub fn append(&mut self, record: &DocumentRecord) -> StorageResult<u64> {
        let serialized = record.serialize();
        let offset = self.current_offset;

        if let Err(e) = self.file.write_all(&serialized) {
            self.discard_partial_write();
            return Err(StorageError::write_failed(
                format!("Failed to write document: {}", record.document_id),
                e,
            ));
        }

        if let Err(e) = self.file.sync_all() {
            self.discard_partial_write();
            return Err(StorageError::write_failed(
                format!("fsync failed after writing document: {}", record.document_id),
                e,
            ));
        }

        self.current_offset += serialized.len() as u64;

        if record.is_tombstone {
            self.live_offsets.remove(&record.document_id);
        } else {
            self.live_offsets.insert(record.document_id.clone(), offset);
        }

        Ok(offset)
    }

    /// Drops any bytes past `current_offset`. If the truncate itself fails,
    /// `current_offset` is moved to the real end of the file instead, so the
    /// next append is indexed where it actually lands.
    fn discard_partial_write(&mut self) {
        let truncated = self
            .file
            .set_len(self.current_offset)
            .and_then(|_| self.file.sync_all());
        let Err(e) = truncated else {
            return;
        };

        warn!(
            offset = self.current_offset,
            error = %e,
            "failed to truncate partial write"
        );
        if let Ok(metadata) = self.file.metadata() {
            self.current_offset = metadata.len();
        }
    }

    pub fn write_tombstone(&mut self, collection: &str, document_id: &str) -> StorageResult<u64> {
        self.append(&DocumentRecord::tombstone(collection, document_id))
    }

    pub fn live_offset(&self, composite_id: &str) -> Option<u64> {
        self.live_offsets.get(composite_id).copied()
    }

    pub fn has_document(&self, composite_id: &str) -> bool {
        self.live_offsets.contains_key(composite_id)
    }

    /// Live `(composite id, offset)` pairs of `collection`, in file order.
    pub fn collection_entries(&self, collection: &str) -> Vec<(String, u64)> {
        let prefix = format!("{}:", collection);
        let mut entries: Vec<(String, u64)> = self
            .live_offsets
            .iter()
            .filter(|(id, _)| id.starts_with(&prefix))
            .map(|(id, offset)| (id.clone(), *offset))
            .collect();
        entries.sort_unstable_by_key(|(_, offset)| *offset);
        entries
    }
}
