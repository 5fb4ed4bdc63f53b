//! On-disk encoding of mapping records.
//!
//! Records are stored as JSON objects with the fields `original_url`,
//! `expires_at` (RFC 3339, nanosecond precision) and `clicks`.

use pinhole_core::{MappingRecord, StorageError};

pub fn encode(record: &MappingRecord) -> Result<String, StorageError> {
    serde_json::to_string(record).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub fn decode(raw: &str) -> Result<MappingRecord, StorageError> {
    serde_json::from_str(raw)
        .map_err(|e| StorageError::InvalidData(format!("undecodable record '{raw}': {e}")))
}
