use crate::Generator;
use pinhole_core::ShortKey;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Symbols a generated key is drawn from: `a-z`, `A-Z`, `0-9`.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every generated key.
pub const KEY_LENGTH: usize = 6;

/// A random short key generator.
///
/// Each character is drawn independently and uniformly from [`ALPHABET`].
/// The RNG is seeded once when the generator is built and shared by all
/// callers behind a mutex.
#[derive(Debug)]
pub struct RandomGenerator {
    rng: Mutex<StdRng>,
}

impl RandomGenerator {
    /// Creates a generator seeded from the operating system's entropy pool,
    /// so separate processes never replay the same key sequence.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Creates a generator with a fixed seed. Two generators built from the
    /// same seed produce the same keys.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn next_key(&self) -> String {
        // The RNG holds no invariant a panicking holder could break.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..KEY_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    type Output = ShortKey;

    fn generate(&self) -> Self::Output {
        ShortKey::new_unchecked(self.next_key())
    }
}
