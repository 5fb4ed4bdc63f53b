use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use pinhole_core::store::{InsertOutcome, RecordStore, Result, UpdateOutcome};
use pinhole_core::{MappingRecord, ShortKey};
use tracing::trace;

/// In-memory implementation of the RecordStore trait using DashMap.
///
/// Atomicity comes from DashMap's shard locks: `put_if_absent` holds the
/// shard write lock through the entry API and `compare_and_update` holds it
/// through the `get_mut` guard, so each operation on a key is serialized
/// against every other operation on that key.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    storage: DashMap<String, MappingRecord>,
}

impl InMemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Number of records held, expired ones included.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get(&self, key: &ShortKey) -> Result<Option<MappingRecord>> {
        Ok(self
            .storage
            .get(key.as_str())
            .map(|entry| entry.value().clone()))
    }

    async fn put_if_absent(&self, key: &ShortKey, record: MappingRecord) -> Result<InsertOutcome> {
        match self.storage.entry(key.as_str().to_owned()) {
            Entry::Occupied(_) => {
                trace!(key = %key, "key already taken");
                Ok(InsertOutcome::AlreadyExists)
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn compare_and_update<F>(&self, key: &ShortKey, update: F) -> Result<UpdateOutcome>
    where
        F: FnOnce(&MappingRecord) -> Option<MappingRecord> + Send + 'static,
    {
        let Some(mut entry) = self.storage.get_mut(key.as_str()) else {
            return Ok(UpdateOutcome::NotFound);
        };

        match update(entry.value()) {
            Some(next) => {
                *entry.value_mut() = next.clone();
                Ok(UpdateOutcome::Updated(next))
            }
            None => Ok(UpdateOutcome::Unchanged(entry.value().clone())),
        }
    }
}
