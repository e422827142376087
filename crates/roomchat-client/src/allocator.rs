//! Room allocation over the room service HTTP API.
//!
//! `create_room` asks the server for a fresh room token. At most one request
//! is in flight per allocator; a concurrent call fails fast with
//! [`AllocationError::InFlight`] instead of queueing a second room.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use roomchat_core::{AllocationError, RoomId};
use roomchat_proto::{CreateRoomResponse, RoomInfo};

use crate::config::ClientConfig;

/// Source of server-allocated rooms.
pub trait RoomAllocator: Send + Sync {
    /// Ask the server for a new room.
    fn create_room(&self) -> impl Future<Output = Result<RoomId, AllocationError>> + Send;

    /// Look up an existing room.
    fn room_info(
        &self,
        room_id: &RoomId,
    ) -> impl Future<Output = Result<RoomInfo, AllocationError>> + Send;
}

/// [`RoomAllocator`] backed by the room service.
///
/// Clones share the HTTP connection pool and the in-flight guard.
#[derive(Debug, Clone)]
pub struct HttpRoomAllocator {
    http: reqwest::Client,
    config: ClientConfig,
    in_flight: Arc<AtomicBool>,
}

impl HttpRoomAllocator {
    /// Create an allocator for the configured server.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create an allocator reusing an existing HTTP client.
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self { http, config, in_flight: Arc::new(AtomicBool::new(false)) }
    }

    /// Whether a `create_room` request is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Clears the in-flight flag when the request finishes or is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RoomAllocator for HttpRoomAllocator {
    async fn create_room(&self) -> Result<RoomId, AllocationError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(AllocationError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let endpoint = self.config.rooms_endpoint();
        tracing::debug!(%endpoint, "requesting room");

        let response = self
            .http
            .post(endpoint)
            .send()
            .await
            .map_err(|e| AllocationError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "room service refused allocation");
            return Err(AllocationError::Status(status.as_u16()));
        }

        let body: CreateRoomResponse = response
            .json()
            .await
            .map_err(|e| AllocationError::InvalidResponse(e.to_string()))?;
        let room_id = RoomId::new(&body.room_id)?;

        tracing::info!(%room_id, "room allocated");
        Ok(room_id)
    }

    async fn room_info(&self, room_id: &RoomId) -> Result<RoomInfo, AllocationError> {
        let response = self
            .http
            .get(self.config.room_endpoint(room_id))
            .send()
            .await
            .map_err(|e| AllocationError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AllocationError::Status(status.as_u16()));
        }

        response.json().await.map_err(|e| AllocationError::InvalidResponse(e.to_string()))
    }
}
