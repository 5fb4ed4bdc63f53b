use crate::settings::ServiceSettings;
use async_trait::async_trait;
use pinhole_core::expiration::resolve_expiration;
use pinhole_core::{
    Clock, InsertOutcome, MappingRecord, RecordStore, Redirect, ShortKey, ShortenParams, Shortener,
    ShortenerError, SystemClock, UpdateOutcome,
};
use pinhole_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `RecordStore`, a `Generator` and a `Clock` to handle:
/// - Short key allocation (caller-chosen or generated, retried on collision)
/// - Expiration defaults and date parsing
/// - Click counting on redirect
///
/// The service keeps no state of its own; every read and write goes through
/// the store's atomic operations.
#[derive(Debug)]
pub struct MappingService<S, G, C = SystemClock> {
    store: Arc<S>,
    generator: Arc<G>,
    clock: Arc<C>,
    settings: ServiceSettings,
}

impl<S: RecordStore, G: Generator> MappingService<S, G, SystemClock> {
    /// Creates a new `MappingService` driven by the system clock.
    pub fn new(store: S, generator: G, settings: ServiceSettings) -> Self {
        Self::with_clock(store, generator, settings, SystemClock)
    }
}

impl<S: RecordStore, G: Generator, C: Clock> MappingService<S, G, C> {
    /// Creates a new `MappingService` with a custom clock.
    pub fn with_clock(store: S, generator: G, settings: ServiceSettings, clock: C) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            clock: Arc::new(clock),
            settings,
        }
    }

    /// Returns the underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::Validation("URL is required".to_string()));
        }
        // Stored URLs end up in the Location header on redirect.
        if url.bytes().any(|b| b.is_ascii_control()) {
            return Err(ShortenerError::Validation(
                "URL contains control characters".to_string(),
            ));
        }
        Ok(())
    }

    async fn insert_custom(
        &self,
        key: ShortKey,
        record: MappingRecord,
    ) -> Result<ShortKey, ShortenerError> {
        match self.store.put_if_absent(&key, record).await? {
            InsertOutcome::Inserted => Ok(key),
            InsertOutcome::AlreadyExists => {
                debug!(key = %key, "custom key already taken");
                Err(ShortenerError::KeyConflict(key.into_string()))
            }
        }
    }

    async fn insert_generated(&self, record: MappingRecord) -> Result<ShortKey, ShortenerError> {
        let attempts = self.settings.max_generation_attempts.max(1);

        for attempt in 1..=attempts {
            let key: ShortKey = self.generator.generate().into();
            match self.store.put_if_absent(&key, record.clone()).await? {
                InsertOutcome::Inserted => return Ok(key),
                InsertOutcome::AlreadyExists => {
                    debug!(key = %key, attempt, "generated key collided, retrying");
                }
            }
        }

        warn!(attempts, "gave up looking for a free short key");
        Err(ShortenerError::KeyGenerationExhausted { attempts })
    }
}

#[async_trait]
impl<S: RecordStore, G: Generator, C: Clock> Shortener for MappingService<S, G, C> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortKey, ShortenerError> {
        Self::validate_url(&params.original_url)?;

        let expires_at = resolve_expiration(
            params.expiration.as_deref(),
            self.clock.now(),
            self.settings.default_ttl,
        )?;
        let record = MappingRecord::new(params.original_url, expires_at);

        let key = match params.custom_key {
            Some(key) => self.insert_custom(key, record).await?,
            None => self.insert_generated(record).await?,
        };

        info!(key = %key, expires_at = %expires_at, "created short url");
        Ok(key)
    }

    async fn redirect(&self, key: &ShortKey) -> Result<Redirect, ShortenerError> {
        trace!(key = %key, "resolving short key");

        // The expiry check runs inside the store transaction, against the
        // same read the increment is based on.
        let clock = Arc::clone(&self.clock);
        let outcome = self
            .store
            .compare_and_update(key, move |record| {
                if record.is_expired_at(clock.now()) {
                    None
                } else {
                    Some(record.with_click())
                }
            })
            .await?;

        match outcome {
            UpdateOutcome::NotFound => {
                trace!(key = %key, "short key not found");
                Err(ShortenerError::NotFound(key.to_string()))
            }
            UpdateOutcome::Unchanged(record) => {
                debug!(key = %key, expires_at = %record.expires_at, "short key has expired");
                Err(ShortenerError::Expired(key.to_string()))
            }
            UpdateOutcome::Updated(record) => {
                debug!(key = %key, clicks = record.clicks, "resolved short key");
                Ok(Redirect {
                    original_url: record.original_url,
                    clicks: record.clicks,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{SignedDuration, Timestamp};
    use pinhole_core::ManualClock;
    use pinhole_generator::RandomGenerator;
    use pinhole_storage::InMemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Always hands out the same key.
    struct ConstantGenerator(&'static str);

    impl Generator for ConstantGenerator {
        type Output = ShortKey;

        fn generate(&self) -> ShortKey {
            ShortKey::new_unchecked(self.0)
        }
    }

    /// Hands out the scripted keys in order, counting calls.
    struct ScriptedGenerator {
        keys: Mutex<Vec<&'static str>>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(mut keys: Vec<&'static str>) -> Self {
            keys.reverse();
            Self {
                keys: Mutex::new(keys),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Generator for ScriptedGenerator {
        type Output = ShortKey;

        fn generate(&self) -> ShortKey {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let key = self.keys.lock().unwrap().pop().expect("script exhausted");
            ShortKey::new_unchecked(key)
        }
    }

    fn start() -> Timestamp {
        "2026-01-01T00:00:00Z".parse().unwrap()
    }

    fn test_service() -> MappingService<InMemoryStore, RandomGenerator, ManualClock> {
        MappingService::with_clock(
            InMemoryStore::new(),
            RandomGenerator::with_seed(7),
            ServiceSettings::default(),
            ManualClock::new(start()),
        )
    }

    #[tokio::test]
    async fn shorten_with_generated_key() {
        let service = test_service();

        let key = service
            .shorten(ShortenParams::new("https://example.com"))
            .await
            .unwrap();

        assert_eq!(key.as_str().len(), 6);
        assert!(key.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        let stored = service.store().get(&key).await.unwrap().unwrap();
        assert_eq!(stored.original_url, "https://example.com");
        assert_eq!(stored.clicks, 0);
    }

    #[tokio::test]
    async fn shorten_with_custom_key() {
        let service = test_service();

        let key = service
            .shorten(
                ShortenParams::new("https://example.com")
                    .with_custom_key(ShortKey::new("my-key").unwrap()),
            )
            .await
            .unwrap();

        assert_eq!(key.as_str(), "my-key");
    }

    #[tokio::test]
    async fn shorten_with_empty_url_fails() {
        let service = test_service();

        let err = service.shorten(ShortenParams::new("")).await.unwrap_err();

        assert!(matches!(err, ShortenerError::Validation(_)));
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn shorten_with_control_characters_fails_without_writing() {
        let service = test_service();

        for url in ["https://a.com/\nb", "https://a.com/\r\nSet-Cookie: x", "https://a.com/\u{7f}"] {
            let err = service.shorten(ShortenParams::new(url)).await.unwrap_err();
            assert!(matches!(err, ShortenerError::Validation(_)), "accepted {url:?}");
        }
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn shorten_keeps_non_ascii_urls() {
        let service = test_service();

        let key = service
            .shorten(ShortenParams::new("https://example.com/café"))
            .await
            .unwrap();

        let redirect = service.redirect(&key).await.unwrap();
        assert_eq!(redirect.original_url, "https://example.com/café");
    }

    #[tokio::test]
    async fn shorten_with_bad_date_fails_without_writing() {
        let service = test_service();

        let err = service
            .shorten(
                ShortenParams::new("https://example.com")
                    .with_custom_key(ShortKey::new("dated").unwrap())
                    .with_expiration("not-a-date"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenerError::InvalidDate(_)));
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn default_expiration_is_seven_days_out() {
        let service = test_service();

        let key = service
            .shorten(ShortenParams::new("https://example.com"))
            .await
            .unwrap();

        let stored = service.store().get(&key).await.unwrap().unwrap();
        assert_eq!(stored.expires_at, start() + SignedDuration::from_hours(7 * 24));
    }

    #[tokio::test]
    async fn custom_expiration_is_honored() {
        let service = test_service();

        let key = service
            .shorten(ShortenParams::new("https://example.com").with_expiration("2099-01-01"))
            .await
            .unwrap();

        let stored = service.store().get(&key).await.unwrap().unwrap();
        assert_eq!(
            stored.expires_at,
            "2099-01-01T00:00:00Z".parse::<Timestamp>().unwrap()
        );
    }

    #[tokio::test]
    async fn duplicate_custom_key_fails_and_keeps_original() {
        let service = test_service();
        let key = ShortKey::new("taken").unwrap();

        service
            .shorten(ShortenParams::new("https://first.com").with_custom_key(key.clone()))
            .await
            .unwrap();
        service.redirect(&key).await.unwrap();

        let err = service
            .shorten(ShortenParams::new("https://second.com").with_custom_key(key.clone()))
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenerError::KeyConflict(ref k) if k == "taken"));
        let stored = service.store().get(&key).await.unwrap().unwrap();
        assert_eq!(stored.original_url, "https://first.com");
        assert_eq!(stored.clicks, 1);
    }

    #[tokio::test]
    async fn generated_key_retries_after_collision() {
        let store = InMemoryStore::new();
        store
            .put_if_absent(
                &ShortKey::new_unchecked("aaaaaa"),
                MappingRecord::new("https://taken.com", start()),
            )
            .await
            .unwrap();
        let service = MappingService::with_clock(
            store,
            ScriptedGenerator::new(vec!["aaaaaa", "bbbbbb"]),
            ServiceSettings::default(),
            ManualClock::new(start()),
        );

        let key = service
            .shorten(ShortenParams::new("https://example.com"))
            .await
            .unwrap();

        assert_eq!(key.as_str(), "bbbbbb");
        assert_eq!(service.generator.calls.load(Ordering::SeqCst), 2);
        let untouched = service
            .store()
            .get(&ShortKey::new_unchecked("aaaaaa"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.original_url, "https://taken.com");
    }

    #[tokio::test]
    async fn generation_gives_up_after_max_attempts() {
        let service = MappingService::with_clock(
            InMemoryStore::new(),
            ConstantGenerator("dupdup"),
            ServiceSettings::builder().max_generation_attempts(3).build(),
            ManualClock::new(start()),
        );

        service
            .shorten(ShortenParams::new("https://first.com"))
            .await
            .unwrap();
        let err = service
            .shorten(ShortenParams::new("https://second.com"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ShortenerError::KeyGenerationExhausted { attempts: 3 }
        ));
        assert_eq!(service.store().len(), 1);
    }

    #[tokio::test]
    async fn zero_attempts_still_tries_once() {
        let service = MappingService::with_clock(
            InMemoryStore::new(),
            ConstantGenerator("single"),
            ServiceSettings::builder().max_generation_attempts(0).build(),
            ManualClock::new(start()),
        );

        let key = service
            .shorten(ShortenParams::new("https://example.com"))
            .await
            .unwrap();
        assert_eq!(key.as_str(), "single");
    }

    #[tokio::test]
    async fn redirect_counts_clicks() {
        let service = test_service();
        let key = service
            .shorten(ShortenParams::new("https://example.com"))
            .await
            .unwrap();

        let first = service.redirect(&key).await.unwrap();
        let second = service.redirect(&key).await.unwrap();

        assert_eq!(first.original_url, "https://example.com");
        assert_eq!(first.clicks, 1);
        assert_eq!(second.clicks, 2);
    }

    #[tokio::test]
    async fn redirect_unknown_key() {
        let service = test_service();

        let err = service
            .redirect(&ShortKey::new_unchecked("nope"))
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenerError::NotFound(_)));
    }

    #[tokio::test]
    async fn redirect_expired_key_leaves_clicks() {
        let clock = ManualClock::new(start());
        let service = MappingService::with_clock(
            InMemoryStore::new(),
            RandomGenerator::with_seed(7),
            ServiceSettings::default(),
            clock.clone(),
        );
        let key = service
            .shorten(ShortenParams::new("https://example.com"))
            .await
            .unwrap();
        service.redirect(&key).await.unwrap();

        // exactly at expires_at counts as expired
        clock.advance(SignedDuration::from_hours(7 * 24));
        let err = service.redirect(&key).await.unwrap_err();

        assert!(matches!(err, ShortenerError::Expired(_)));
        assert_eq!(service.store().get(&key).await.unwrap().unwrap().clicks, 1);
    }

    #[tokio::test]
    async fn redirect_just_before_expiry_succeeds() {
        let clock = ManualClock::new(start());
        let service = MappingService::with_clock(
            InMemoryStore::new(),
            RandomGenerator::with_seed(7),
            ServiceSettings::default(),
            clock.clone(),
        );
        let key = service
            .shorten(ShortenParams::new("https://example.com"))
            .await
            .unwrap();

        clock.advance(SignedDuration::from_hours(7 * 24) - SignedDuration::from_secs(1));
        let redirect = service.redirect(&key).await.unwrap();
        assert_eq!(redirect.clicks, 1);
    }

    #[tokio::test]
    async fn works_behind_trait_object() {
        let service: Arc<dyn Shortener> = Arc::new(test_service());

        let key = service
            .shorten(ShortenParams::new("https://example.com"))
            .await
            .unwrap();
        let redirect = service.redirect(&key).await.unwrap();
        assert_eq!(redirect.original_url, "https://example.com");
    }
}
