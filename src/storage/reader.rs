//! Sequential and point reads over the document file
//!
//! Every record read is checksum-verified. A bad record aborts the read with
//! `USERS_DATA_CORRUPTION`; nothing past it is trusted.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::errors::{StorageError, StorageResult};
use super::record::{DocumentRecord, MIN_RECORD_SIZE};

/// Offsets of the latest live record per composite id, plus scan totals.
#[derive(Debug, Default)]
pub struct LiveIndex {
    pub offsets: HashMap<String, u64>,
    /// Every record in the file, tombstones and superseded writes included
    pub total_records: usize,
}

pub struct StorageReader {
    reader: BufReader<File>,
    current_offset: u64,
    file_size: u64,
}

impl StorageReader {
    pub fn open(storage_path: &Path) -> StorageResult<Self> {
        let file = File::open(storage_path).map_err(|e| {
            StorageError::read_failed(
                format!("Failed to open storage file: {}", storage_path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
        })
    }

    /// Opens `<data_dir>/data/documents.dat`.
    pub fn open_from_data_dir(data_dir: &Path) -> StorageResult<Self> {
        Self::open(&super::storage_file(data_dir))
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    pub fn has_more(&self) -> bool {
        self.current_offset < self.file_size
    }

    /// Reads the record at the current offset.
    ///
    /// - `Ok(Some(record))` if a record was read
    /// - `Ok(None)` at end of file
    /// - `Err(USERS_DATA_CORRUPTION)` on truncation or checksum failure
    pub fn read_next(&mut self) -> StorageResult<Option<DocumentRecord>> {
        if self.current_offset >= self.file_size {
            return Ok(None);
        }

        let remaining = self.file_size - self.current_offset;

        if remaining < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Truncated storage: {} bytes remaining, minimum record size is {}",
                    remaining, MIN_RECORD_SIZE
                ),
            ));
        }

        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record length: {}", e),
            )
        })?;
        let record_length = u32::from_le_bytes(len_buf) as u64;

        if record_length < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if record_length > remaining {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Record length {} exceeds remaining file size {}",
                    record_length, remaining
                ),
            ));
        }

        let mut record_buf = vec![0u8; record_length as usize];
        record_buf[0..4].copy_from_slice(&len_buf);

        self.reader.read_exact(&mut record_buf[4..]).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record body: {}", e),
            )
        })?;

        let (record, consumed) = DocumentRecord::deserialize(&record_buf)
            .map_err(|e| StorageError::corruption_at_offset(self.current_offset, e.to_string()))?;

        self.current_offset += consumed as u64;

        Ok(Some(record))
    }

    pub fn read_all(&mut self) -> StorageResult<Vec<DocumentRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }

    pub fn seek_to(&mut self, offset: u64) -> StorageResult<()> {
        self.reader.seek(SeekFrom::Start(offset)).map_err(|e| {
            StorageError::read_failed(format!("Failed to seek to offset {}", offset), e)
        })?;
        self.current_offset = offset;
        Ok(())
    }

    /// Reads the single record starting at `offset`.
    pub fn read_at(&mut self, offset: u64) -> StorageResult<DocumentRecord> {
        self.seek_to(offset)?;
        match self.read_next()? {
            Some(record) => Ok(record),
            None => Err(StorageError::corruption_at_offset(
                offset,
                "No record at specified offset",
            )),
        }
    }

    pub fn reset(&mut self) -> StorageResult<()> {
        self.seek_to(0)
    }

    /// Scans the whole file and resolves overwrites and deletes.
    ///
    /// Latest record (by file order) wins; a tombstone drops the id.
    pub fn build_live_index(&mut self) -> StorageResult<LiveIndex> {
        self.reset()?;

        let mut index = LiveIndex::default();

        loop {
            let offset = self.current_offset;
            match self.read_next()? {
                Some(record) => {
                    index.total_records += 1;
                    if record.is_tombstone {
                        index.offsets.remove(&record.document_id);
                    } else {
                        index.offsets.insert(record.document_id, offset);
                    }
                }
                None => break,
            }
        }

        Ok(index)
    }
}
