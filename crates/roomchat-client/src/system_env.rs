//! Production environment backed by OS entropy.

use roomchat_core::env::Environment;

/// [`Environment`] using the operating system's random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create the system environment.
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer)
            .expect("invariant: OS RNG failure is unrecoverable - no room token can be generated");
    }
}

#[cfg(test)]
mod tests {
    use roomchat_core::RoomId;

    use super::*;

    #[test]
    fn generated_room_is_lowercase_alphanumeric() {
        let room = RoomId::generate(&SystemEnv::new());
        assert_eq!(room.as_str().len(), 6);
        assert!(room.as_str().chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
