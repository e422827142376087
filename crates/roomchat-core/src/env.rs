//! Environment abstraction for deterministic testing.
//!
//! Decouples room token generation from the system RNG. Production uses OS
//! entropy; simulation uses a seeded generator so that generated room ids are
//! reproducible.

/// Abstract source of randomness.
///
/// # Invariants
///
/// - `random_bytes()` fills the whole buffer
/// - Given the same seed, a simulated environment produces the same sequence
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }
}
