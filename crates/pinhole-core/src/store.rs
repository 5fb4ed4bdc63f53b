use crate::error::StorageError;
use crate::record::MappingRecord;
use crate::shortkey::ShortKey;
use async_trait::async_trait;

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Outcome of [`RecordStore::put_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was stored under the key.
    Inserted,
    /// The key was already taken; nothing was written.
    AlreadyExists,
}

/// Outcome of [`RecordStore::compare_and_update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No record exists for the key.
    NotFound,
    /// The update function declined to write; carries the record as read.
    Unchanged(MappingRecord),
    /// The new record was committed.
    Updated(MappingRecord),
}

/// A transactional mapping of short key to record.
///
/// Every operation is atomic with respect to every other operation on the
/// same store: readers never observe a half-written record, and concurrent
/// writers to one key are serialized.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Retrieves the record stored under `key`, if any.
    async fn get(&self, key: &ShortKey) -> Result<Option<MappingRecord>>;

    /// Stores `record` under `key` only if the key is not taken yet.
    ///
    /// The existence check and the write happen in one transaction, so two
    /// callers racing on the same key cannot both see [`InsertOutcome::Inserted`].
    async fn put_if_absent(&self, key: &ShortKey, record: MappingRecord) -> Result<InsertOutcome>;

    /// Atomically reads the record under `key`, applies `update` and writes back.
    ///
    /// `update` returns `None` to leave the record untouched. It runs while
    /// the key is locked, so it must be pure and fast.
    async fn compare_and_update<F>(&self, key: &ShortKey, update: F) -> Result<UpdateOutcome>
    where
        F: FnOnce(&MappingRecord) -> Option<MappingRecord> + Send + 'static;
}
