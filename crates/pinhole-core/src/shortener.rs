use crate::error::ShortenerError;
use crate::shortkey::ShortKey;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone, Default)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub original_url: String,
    /// Optional caller-chosen key for the shortened URL.
    pub custom_key: Option<ShortKey>,
    /// Optional expiration date, formatted `YYYY-MM-DD`.
    pub expiration: Option<String>,
}

impl ShortenParams {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            ..Self::default()
        }
    }

    pub fn with_custom_key(mut self, key: ShortKey) -> Self {
        self.custom_key = Some(key);
        self
    }

    pub fn with_expiration(mut self, date: impl Into<String>) -> Self {
        self.expiration = Some(date.into());
        self
    }
}

/// A successful redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Where the visitor should be sent.
    pub original_url: String,
    /// The click count after this redirect.
    pub clicks: u64,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a shortened URL and returns the assigned short key.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortKey>;

    /// Resolves a short key for a visitor and counts the click.
    async fn redirect(&self, key: &ShortKey) -> Result<Redirect>;
}
