use jiff::SignedDuration;
use pinhole_core::expiration::DEFAULT_TTL;
use typed_builder::TypedBuilder;

/// Default cap on generate-and-insert rounds for one shorten request.
pub const DEFAULT_MAX_GENERATION_ATTEMPTS: u32 = 16;

/// Configures a [`MappingService`][crate::MappingService] instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ServiceSettings {
    /// How many generated keys to try before giving up. Values below 1 are
    /// treated as 1.
    #[builder(default = DEFAULT_MAX_GENERATION_ATTEMPTS)]
    pub max_generation_attempts: u32,
    /// Lifetime of a mapping created without an explicit expiration date.
    #[builder(default = DEFAULT_TTL)]
    pub default_ttl: SignedDuration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
