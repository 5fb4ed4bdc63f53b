use pinhole_core::{ShortKey, ShortenParams, ShortenerError};
use serde::Deserialize;

/// Form body of `POST /shorten`.
///
/// Browsers submit empty inputs as empty strings, so blank optional fields
/// count as not supplied.
#[derive(Debug, Default, Deserialize)]
pub struct ShortenForm {
    #[serde(default)]
    pub url: String,
    pub custom_key: Option<String>,
    pub expiration: Option<String>,
}

impl ShortenForm {
    pub fn into_params(self) -> Result<ShortenParams, ShortenerError> {
        let custom_key = non_empty(self.custom_key).map(ShortKey::new).transpose()?;

        Ok(ShortenParams {
            original_url: self.url,
            custom_key,
            expiration: non_empty(self.expiration),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
