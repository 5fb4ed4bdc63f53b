use crate::codec;
use async_trait::async_trait;
use pinhole_core::store::{InsertOutcome, RecordStore, Result, UpdateOutcome};
use pinhole_core::{MappingRecord, ShortKey, StorageError};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

/// The single collection holding every mapping: short key to JSON record.
const URLS: TableDefinition<&str, &str> = TableDefinition::new("urls");

/// Durable record store backed by an embedded `redb` database.
///
/// redb serializes write transactions, so the check and the write inside
/// `put_if_absent` and `compare_and_update` cannot interleave with another
/// writer. Reads run on MVCC snapshots and only ever see committed data.
///
/// Each transaction runs to completion on the blocking pool. Dropping the
/// calling future (a cancelled request) never interrupts a commit.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Creates or opens the database file at `path` and makes sure the
    /// `urls` table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = Database::create(path).map_err(map_redb_error)?;
        let store = Self::new(db)?;
        debug!(path = %path.display(), "opened redb record store");
        Ok(store)
    }

    /// Wraps an already opened database, creating the `urls` table if needed.
    pub fn new(db: Database) -> Result<Self> {
        let txn = db.begin_write().map_err(map_redb_error)?;
        txn.open_table(URLS).map_err(map_redb_error)?;
        txn.commit().map_err(map_redb_error)?;

        Ok(Self { db: Arc::new(db) })
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| StorageError::Operation(format!("storage task failed: {e}")))?
    }
}

fn map_redb_error(err: impl Into<redb::Error>) -> StorageError {
    let err = err.into();
    let message = err.to_string();

    match err {
        redb::Error::Io(_) | redb::Error::DatabaseAlreadyOpen => {
            StorageError::Unavailable(message)
        }
        redb::Error::Corrupted(_) => StorageError::InvalidData(message),
        _ => StorageError::Transaction(message),
    }
}

#[async_trait]
impl RecordStore for RedbStore {
    async fn get(&self, key: &ShortKey) -> Result<Option<MappingRecord>> {
        let key = key.as_str().to_owned();

        self.run_blocking(move |db| {
            let txn = db.begin_read().map_err(map_redb_error)?;
            let table = txn.open_table(URLS).map_err(map_redb_error)?;
            let raw = table.get(key.as_str()).map_err(map_redb_error)?;
            raw.map(|guard| codec::decode(guard.value())).transpose()
        })
        .await
    }

    async fn put_if_absent(&self, key: &ShortKey, record: MappingRecord) -> Result<InsertOutcome> {
        let key = key.as_str().to_owned();
        let encoded = codec::encode(&record)?;

        self.run_blocking(move |db| {
            let txn = db.begin_write().map_err(map_redb_error)?;
            let taken = {
                let mut table = txn.open_table(URLS).map_err(map_redb_error)?;
                let taken = table
                    .get(key.as_str())
                    .map_err(map_redb_error)?
                    .is_some();
                if !taken {
                    table
                        .insert(key.as_str(), encoded.as_str())
                        .map_err(map_redb_error)?;
                }
                taken
            };

            if taken {
                txn.abort().map_err(map_redb_error)?;
                trace!(key = %key, "key already taken");
                return Ok(InsertOutcome::AlreadyExists);
            }

            txn.commit().map_err(map_redb_error)?;
            Ok(InsertOutcome::Inserted)
        })
        .await
    }

    async fn compare_and_update<F>(&self, key: &ShortKey, update: F) -> Result<UpdateOutcome>
    where
        F: FnOnce(&MappingRecord) -> Option<MappingRecord> + Send + 'static,
    {
        let key = key.as_str().to_owned();

        self.run_blocking(move |db| {
            let txn = db.begin_write().map_err(map_redb_error)?;
            let outcome = {
                let mut table = txn.open_table(URLS).map_err(map_redb_error)?;
                let current = table
                    .get(key.as_str())
                    .map_err(map_redb_error)?
                    .map(|guard| codec::decode(guard.value()))
                    .transpose()?;

                match current {
                    None => UpdateOutcome::NotFound,
                    Some(current) => match update(&current) {
                        None => UpdateOutcome::Unchanged(current),
                        Some(next) => {
                            let encoded = codec::encode(&next)?;
                            table
                                .insert(key.as_str(), encoded.as_str())
                                .map_err(map_redb_error)?;
                            UpdateOutcome::Updated(next)
                        }
                    },
                }
            };

            match outcome {
                UpdateOutcome::Updated(_) => txn.commit().map_err(map_redb_error)?,
                _ => txn.abort().map_err(map_redb_error)?,
            }

            Ok(outcome)
        })
        .await
    }
}
