//! Client configuration.
//!
//! Every endpoint is derived from one server URL:
//!
//! ```text
//! server         http://localhost:8000/
//! create room    http://localhost:8000/api/rooms
//! room lookup    http://localhost:8000/api/rooms/{room_id}
//! transport      ws://localhost:8000/ws/{room_id}
//! room page      http://localhost:8000/room.html?room={room_id}
//! ```
//!
//! `https` servers map to `wss` transports.

use roomchat_core::RoomId;
use url::Url;

use crate::error::ConfigError;

/// Default room server.
pub const DEFAULT_SERVER: &str = "http://localhost:8000";

/// Path of the room page, relative to the server.
pub const ROOM_PAGE: &str = "room.html";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server base URL; path always ends with `/`.
    server: Url,
}

impl ClientConfig {
    /// Build a configuration from a server URL.
    ///
    /// # Errors
    ///
    /// - `ConfigError::InvalidUrl` if `server` does not parse
    /// - `ConfigError::UnsupportedScheme` unless `http` or `https`
    pub fn new(server: &str) -> Result<Self, ConfigError> {
        let mut url = Url::parse(server).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_owned()));
        }

        url.set_query(None);
        url.set_fragment(None);
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self { server: url })
    }

    /// Server base URL.
    pub fn server(&self) -> &Url {
        &self.server
    }

    /// `POST` endpoint that allocates rooms.
    pub fn rooms_endpoint(&self) -> Url {
        self.join("api/rooms")
    }

    /// `GET` endpoint describing one room.
    pub fn room_endpoint(&self, room_id: &RoomId) -> Url {
        self.join(&format!("api/rooms/{room_id}"))
    }

    /// Realtime transport URL for a room.
    pub fn websocket_url(&self, room_id: &RoomId) -> Url {
        let mut url = self.join(&format!("ws/{room_id}"));
        let scheme = if self.server.scheme() == "https" { "wss" } else { "ws" };
        // http(s) -> ws(s) stays within the special schemes, which cannot fail.
        let _ = url.set_scheme(scheme);
        url
    }

    /// Room page URL without a room; room links are built on top of it.
    pub fn page_base(&self) -> Url {
        self.join(ROOM_PAGE)
    }

    fn join(&self, path: &str) -> Url {
        // Relative paths of unreserved characters always join onto an http(s) base.
        self.server.join(path).unwrap_or_else(|_| self.server.clone())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER).unwrap_or_else(|_| unreachable!("default server url is valid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> RoomId {
        RoomId::new("a3f9c1").unwrap()
    }

    #[test]
    fn default_points_at_localhost() {
        let config = ClientConfig::default();
        assert_eq!(config.server().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn endpoints_derive_from_server() {
        let config = ClientConfig::new("http://localhost:8000").unwrap();

        assert_eq!(config.rooms_endpoint().as_str(), "http://localhost:8000/api/rooms");
        assert_eq!(config.room_endpoint(&room()).as_str(), "http://localhost:8000/api/rooms/a3f9c1");
        assert_eq!(config.websocket_url(&room()).as_str(), "ws://localhost:8000/ws/a3f9c1");
        assert_eq!(config.page_base().as_str(), "http://localhost:8000/room.html");
    }

    #[test]
    fn https_maps_to_wss() {
        let config = ClientConfig::new("https://chat.example.com/").unwrap();
        assert_eq!(config.websocket_url(&room()).as_str(), "wss://chat.example.com/ws/a3f9c1");
    }

    #[test]
    fn path_prefix_is_kept() {
        let config = ClientConfig::new("http://host/chat?x=1").unwrap();
        assert_eq!(config.rooms_endpoint().as_str(), "http://host/chat/api/rooms");
        assert_eq!(config.websocket_url(&room()).as_str(), "ws://host/chat/ws/a3f9c1");
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        assert_eq!(
            ClientConfig::new("ftp://host"),
            Err(ConfigError::UnsupportedScheme("ftp".into()))
        );
        assert!(matches!(ClientConfig::new("not a url"), Err(ConfigError::InvalidUrl(_))));
    }
}
