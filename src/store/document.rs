//! User store over the append-only document file
//!
//! Users are JSON documents in the `users` collection. Saves append a live
//! record, deletes append a tombstone, and reads go through the writer's live
//! index to a single checksummed record.

use std::path::Path;
use std::sync::Mutex;

use tracing::{debug, info};

use super::{assign_id, StoreError, StoreResult, UserStore};
use crate::storage::{
    composite_id, DocumentRecord, StorageError, StorageReader, StorageWriter,
};
use crate::users::User;

pub const USERS_COLLECTION: &str = "users";

/// Durable [`UserStore`].
///
/// One mutex guards the writer and its index; each store call holds it for
/// the whole call so a lookup never sees a half-applied append.
pub struct DocumentStore {
    writer: Mutex<StorageWriter>,
}

impl DocumentStore {
    /// Opens (or creates) the document file under `data_dir` and rebuilds the
    /// live index from it.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        let writer = StorageWriter::open(data_dir)?;
        info!(
            path = %writer.path().display(),
            documents = writer.document_count(),
            "opened document store"
        );
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }

    /// Live user count.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self
            .writer
            .lock()?
            .collection_entries(USERS_COLLECTION)
            .len())
    }

    /// Reads the record at `offset` and checks it is the one indexed there.
    fn read_indexed(
        reader: &mut StorageReader,
        document_id: &str,
        offset: u64,
    ) -> StoreResult<DocumentRecord> {
        let record = reader.read_at(offset)?;
        if record.document_id != document_id {
            return Err(StorageError::data_corruption(format!(
                "Index points {} at offset {}, which holds {}",
                document_id, offset, record.document_id
            ))
            .into());
        }
        Ok(record)
    }

    fn decode(record: &DocumentRecord) -> StoreResult<User> {
        let local_id = record
            .split_id()
            .map(|(_, id)| id)
            .unwrap_or(record.document_id.as_str());
        let user: User = serde_json::from_slice(&record.document_body)
            .map_err(|e| StoreError::encoding(local_id, e))?;
        // The key is authoritative for the id, not the body.
        Ok(user.with_id(local_id))
    }
}

impl UserStore for DocumentStore {
    fn save(&self, user: User) -> StoreResult<User> {
        let (id, user) = assign_id(user);
        let body = serde_json::to_vec(&user).map_err(|e| StoreError::encoding(&id, e))?;

        let mut writer = self.writer.lock()?;
        let offset = writer.append(&DocumentRecord::live(USERS_COLLECTION, &id, body))?;
        debug!(user_id = %id, offset, "appended user document");

        Ok(user)
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<User>> {
        let writer = self.writer.lock()?;
        let document_id = composite_id(USERS_COLLECTION, id);
        let Some(offset) = writer.live_offset(&document_id) else {
            return Ok(None);
        };

        let mut reader = StorageReader::open(writer.path())?;
        let record = Self::read_indexed(&mut reader, &document_id, offset)?;
        Self::decode(&record).map(Some)
    }

    fn exists_by_id(&self, id: &str) -> StoreResult<bool> {
        Ok(self
            .writer
            .lock()?
            .has_document(&composite_id(USERS_COLLECTION, id)))
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<()> {
        let mut writer = self.writer.lock()?;
        if !writer.has_document(&composite_id(USERS_COLLECTION, id)) {
            return Ok(());
        }
        let offset = writer.write_tombstone(USERS_COLLECTION, id)?;
        debug!(user_id = %id, offset, "appended user tombstone");
        Ok(())
    }

    fn find_all(&self) -> StoreResult<Vec<User>> {
        let writer = self.writer.lock()?;
        let entries = writer.collection_entries(USERS_COLLECTION);
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = StorageReader::open(writer.path())?;
        entries
            .into_iter()
            .map(|(document_id, offset)| {
                Self::decode(&Self::read_indexed(&mut reader, &document_id, offset)?)
            })
            .collect()
    }
}
