//! Durable document storage
//!
//! A single append-only file of checksummed records, `documents.dat`,
//! under `<data_dir>/data/`.
//!
//! - Append-only, no in-place updates
//! - CRC32 verified on every read
//! - Latest record wins for the same document id
//! - Tombstones mark deletes
//! - fsync after every append
//!
//! Any checksum failure is fatal for the read that hit it.

mod errors;
mod reader;
mod record;
mod writer;

use std::path::{Path, PathBuf};

pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use reader::{LiveIndex, StorageReader};
pub use record::{composite_id, DocumentRecord};
pub use writer::StorageWriter;

/// Location of the document file inside a data directory.
pub fn storage_file(data_dir: &Path) -> PathBuf {
    data_dir.join("data").join("documents.dat")
}
