use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored mapping from a short key to its redirect target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    /// The original URL that was shortened.
    pub original_url: String,
    /// The instant from which the record is considered expired.
    pub expires_at: Timestamp,
    /// Number of successful redirects served for this record.
    pub clicks: u64,
}

impl MappingRecord {
    /// Creates a fresh record with a zero click count.
    pub fn new(original_url: impl Into<String>, expires_at: Timestamp) -> Self {
        Self {
            original_url: original_url.into(),
            expires_at,
            clicks: 0,
        }
    }

    /// Whether the record is expired at `now`. The boundary is inclusive.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    /// Returns a copy of the record with one more click.
    pub fn with_click(&self) -> Self {
        Self {
            original_url: self.original_url.clone(),
            expires_at: self.expires_at,
            clicks: self.clicks.saturating_add(1),
        }
    }
}
