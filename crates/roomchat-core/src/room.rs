//! Room identity.
//!
//! A [`RoomId`] is created either by the room service (`POST /api/rooms`) or
//! locally from random bytes, and travels between pages as the `room` query
//! parameter of the room page URL. The room page reads it back with
//! [`resolve_active_room`]; a missing or blank value must stop the session
//! from starting rather than fall back to a default room.

use std::{fmt, str::FromStr};

use url::Url;

use crate::{env::Environment, error::RoomError};

/// Query parameter carrying the room identifier on the room page URL.
pub const ROOM_QUERY_PARAM: &str = "room";

/// Length of locally generated room tokens.
pub const GENERATED_ROOM_LEN: usize = 6;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Largest multiple of 36 that fits in a byte. Bytes at or above it are
/// redrawn so every character is equally likely.
const UNBIASED_LIMIT: u8 = 252;

/// Opaque, URL-safe, case-sensitive room identifier.
///
/// # Invariants
///
/// - Never empty
/// - No surrounding whitespace
/// - Only RFC 3986 unreserved characters: `A-Z a-z 0-9 - _ . ~`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// Validate a raw identifier. Surrounding whitespace is trimmed first.
    pub fn new(raw: &str) -> Result<Self, RoomError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RoomError::Missing);
        }

        if let Some(found) = trimmed.chars().find(|c| !is_unreserved(*c)) {
            return Err(RoomError::InvalidCharacter { room_id: trimmed.to_owned(), found });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Generate a random lowercase base-36 token of [`GENERATED_ROOM_LEN`]
    /// characters.
    pub fn generate<E: Environment>(env: &E) -> Self {
        let mut token = String::with_capacity(GENERATED_ROOM_LEN);
        let mut bytes = [0u8; GENERATED_ROOM_LEN];

        while token.len() < GENERATED_ROOM_LEN {
            env.random_bytes(&mut bytes);
            let accepted = bytes.iter().filter(|b| **b < UNBIASED_LIMIT);
            for b in accepted.take(GENERATED_ROOM_LEN - token.len()) {
                token.push(char::from(BASE36[usize::from(*b) % BASE36.len()]));
            }
        }

        Self(token)
    }

    /// Identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomId {
    type Err = RoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~')
}

/// Extract the active room from the room page URL.
///
/// # Errors
///
/// - `RoomError::Missing` if the `room` parameter is absent or blank
/// - `RoomError::InvalidCharacter` if it is not URL-safe
pub fn resolve_active_room(context: &Url) -> Result<RoomId, RoomError> {
    let raw = context
        .query_pairs()
        .find(|(key, _)| key == ROOM_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .ok_or(RoomError::Missing)?;

    RoomId::new(&raw)
}

/// Build the room page URL for `room_id` on top of `base`.
///
/// Any existing query or fragment on `base` is replaced.
pub fn room_page_url(base: &Url, room_id: &RoomId) -> Url {
    let mut url = base.clone();
    url.set_fragment(None);
    url.query_pairs_mut().clear().append_pair(ROOM_QUERY_PARAM, room_id.as_str());
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct CountingEnv;

    impl Environment for CountingEnv {
        fn random_bytes(&self, buffer: &mut [u8]) {
            for (i, byte) in buffer.iter_mut().enumerate() {
                *byte = (i as u8).wrapping_mul(37);
            }
        }
    }

    /// Yields a run of 255s before counting up from zero.
    #[derive(Clone, Default)]
    struct HighBytesFirstEnv {
        calls: std::sync::Arc<std::sync::atomic::AtomicUsize>,
    }

    impl Environment for HighBytesFirstEnv {
        fn random_bytes(&self, buffer: &mut [u8]) {
            let call = self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            for (i, byte) in buffer.iter_mut().enumerate() {
                *byte = if call == 0 && i < 4 { 255 } else { 250 + (i as u8 % 2) };
            }
        }
    }

    fn page() -> Url {
        Url::parse("http://localhost:8000/room.html").unwrap()
    }

    #[test]
    fn new_trims_whitespace() {
        assert_eq!(RoomId::new("  a3f9c1 \n").unwrap().as_str(), "a3f9c1");
    }

    #[test]
    fn blank_id_is_missing() {
        assert_eq!(RoomId::new(""), Err(RoomError::Missing));
        assert_eq!(RoomId::new("   "), Err(RoomError::Missing));
    }

    #[test]
    fn unsafe_characters_are_rejected() {
        assert_eq!(
            RoomId::new("a b"),
            Err(RoomError::InvalidCharacter { room_id: "a b".into(), found: ' ' })
        );
        assert!(RoomId::new("room/1").is_err());
        assert!(RoomId::new("röom").is_err());
    }

    #[test]
    fn ids_are_case_sensitive() {
        assert_ne!(RoomId::new("Lobby").unwrap(), RoomId::new("lobby").unwrap());
    }

    #[test]
    fn generated_ids_are_valid_tokens() {
        let id = RoomId::generate(&CountingEnv);
        assert_eq!(id.as_str().len(), GENERATED_ROOM_LEN);
        assert_eq!(RoomId::new(id.as_str()), Ok(id.clone()));
        assert!(id.as_str().chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn generate_redraws_out_of_range_bytes() {
        let env = HighBytesFirstEnv::default();
        let id = RoomId::generate(&env);

        // 250 % 36 = 34 ('y'), 251 % 36 = 35 ('z'); 255 would have wrapped to '3'.
        assert_eq!(id.as_str(), "yzyzyz");
        assert_eq!(env.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn resolve_reads_query_parameter() {
        let url = Url::parse("http://localhost:8000/room.html?room=a3f9c1").unwrap();
        assert_eq!(resolve_active_room(&url).unwrap().as_str(), "a3f9c1");
    }

    #[test]
    fn resolve_without_parameter_is_missing() {
        assert_eq!(resolve_active_room(&page()), Err(RoomError::Missing));
    }

    #[test]
    fn resolve_blank_parameter_is_missing() {
        let url = Url::parse("http://localhost:8000/room.html?room=%20%20").unwrap();
        assert_eq!(resolve_active_room(&url), Err(RoomError::Missing));
    }

    #[test]
    fn page_url_round_trips_through_resolve() {
        let room_id = RoomId::new("x-y_z.1~").unwrap();
        let url = room_page_url(&page(), &room_id);

        assert_eq!(url.as_str(), "http://localhost:8000/room.html?room=x-y_z.1%7E");
        assert_eq!(resolve_active_room(&url), Ok(room_id));
    }

    #[test]
    fn page_url_replaces_existing_query() {
        let base = Url::parse("http://localhost:8000/room.html?room=old&x=1#top").unwrap();
        let url = room_page_url(&base, &RoomId::new("new").unwrap());
        assert_eq!(url.query(), Some("room=new"));
        assert_eq!(url.fragment(), None);
    }
}
