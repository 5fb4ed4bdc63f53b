pub mod random;

pub use random::RandomGenerator;

use pinhole_core::ShortKey;

/// Trait for generating short keys.
///
/// Implementations are pure generators that don't interact with storage.
/// Generated keys may collide with keys already in use; callers detect that
/// through the store and ask for another key.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortKey>;
    /// Generates a candidate short key.
    fn generate(&self) -> Self::Output;
}
