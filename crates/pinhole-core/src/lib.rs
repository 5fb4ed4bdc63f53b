//! Core types and traits for the Pinhole URL shortener.
//!
//! This crate provides the types shared by the key generator, the record
//! store backends, the mapping service and the HTTP gateway.

pub mod clock;
pub mod error;
pub mod expiration;
pub mod record;
pub mod shortener;
pub mod shortkey;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ShortenerError, StorageError};
pub use record::MappingRecord;
pub use shortener::{Redirect, ShortenParams, Shortener};
pub use shortkey::ShortKey;
pub use store::{InsertOutcome, RecordStore, UpdateOutcome};
