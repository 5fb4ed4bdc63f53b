//! Record store backends for Pinhole.
//!
//! [`InMemoryStore`] keeps records in a sharded concurrent map and is meant
//! for tests and throwaway deployments. [`RedbStore`] persists records in an
//! embedded `redb` database file.

pub mod codec;
pub mod memory;
pub mod redb_store;

pub use memory::InMemoryStore;
pub use pinhole_core::store::{InsertOutcome, RecordStore, Result, UpdateOutcome};
pub use pinhole_core::StorageError;
pub use redb_store::RedbStore;
