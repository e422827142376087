//! In-memory relay mirroring the room server.
//!
//! Behaves like the paired server: rooms are 6 hex characters, created on
//! demand when a client connects and dropped when the last client leaves.
//! Text from one client is relayed verbatim to every other client in the same
//! room, never echoed back. On top of that the relay emits the control frames
//! a client expects: `welcome` to a newly connected client and `join`/`leave`
//! to the others.
//!
//! Each connected client has an inbox of [`TransportEvent`]s that its driver
//! drains, so delivery order per client is exactly relay order.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    collections::{BTreeSet, HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use roomchat_core::{AllocationError, RoomId, TransportEvent, env::Environment};
use roomchat_proto::{ControlEvent, RoomInfo, encode_control};

use crate::SimEnv;

/// Relay-assigned connection identifier.
pub type ClientId = u64;

/// Relay shared between simulated drivers.
pub type SharedRelay = Arc<Mutex<SimRelay>>;

/// Create a relay that several drivers can share.
pub fn create_shared_relay(env: SimEnv) -> SharedRelay {
    Arc::new(Mutex::new(SimRelay::new(env)))
}

/// Lock a shared relay, recovering from poisoning.
pub fn lock_relay(relay: &SharedRelay) -> MutexGuard<'_, SimRelay> {
    relay.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One connection's server-side state.
struct Link {
    room_id: RoomId,
    /// Events not yet drained by the client.
    inbox: VecDeque<TransportEvent>,
    /// Still a room member. False once closed by either side.
    open: bool,
}

/// In-memory room relay.
pub struct SimRelay {
    env: SimEnv,
    /// Room members, ordered by connection id.
    rooms: HashMap<RoomId, BTreeSet<ClientId>>,
    links: HashMap<ClientId, Link>,
    next_client_id: ClientId,
    /// Whether the room service answers allocation requests.
    reachable: bool,
    /// Every frame relayed, as (sender, room, text).
    relayed: Vec<(ClientId, RoomId, String)>,
}

impl SimRelay {
    /// Create an empty, reachable relay.
    pub fn new(env: SimEnv) -> Self {
        Self {
            env,
            rooms: HashMap::new(),
            links: HashMap::new(),
            next_client_id: 1,
            reachable: true,
            relayed: Vec::new(),
        }
    }

    /// Make the room service unreachable (or reachable again).
    pub fn set_reachable(&mut self, reachable: bool) {
        self.reachable = reachable;
    }

    /// Allocate a fresh room, like `POST /api/rooms`.
    ///
    /// # Errors
    ///
    /// - `AllocationError::Unreachable` if the service is switched off
    pub fn allocate_room(&mut self) -> Result<RoomId, AllocationError> {
        if !self.reachable {
            return Err(AllocationError::Unreachable("relay offline".into()));
        }

        loop {
            let mut bytes = [0u8; 3];
            self.env.random_bytes(&mut bytes);
            let token: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
            let room_id = RoomId::new(&token)?;

            if !self.rooms.contains_key(&room_id) {
                self.rooms.insert(room_id.clone(), BTreeSet::new());
                tracing::debug!(room = %room_id, "allocated room");
                return Ok(room_id);
            }
        }
    }

    /// Look up a room, like `GET /api/rooms/{room_id}`.
    pub fn room_info(&self, room_id: &RoomId) -> RoomInfo {
        let members = self.rooms.get(room_id);
        RoomInfo {
            room_id: room_id.to_string(),
            exists: members.is_some(),
            num_clients: members.map_or(0, BTreeSet::len),
        }
    }

    /// Accept a connection to `room_id`.
    ///
    /// The new client's inbox receives `Opened` then `welcome`; every other
    /// member receives `join`.
    pub fn connect(&mut self, room_id: &RoomId) -> ClientId {
        let client_id = self.next_client_id;
        self.next_client_id += 1;

        let welcome = encode_control(&ControlEvent::Welcome { client_id: Some(client_id.to_string()) });
        let inbox = VecDeque::from([TransportEvent::Opened, TransportEvent::Message(welcome)]);

        self.notify_room(room_id, None, &encode_control(&ControlEvent::PeerJoined));
        self.rooms.entry(room_id.clone()).or_default().insert(client_id);
        self.links.insert(client_id, Link { room_id: room_id.clone(), inbox, open: true });

        tracing::debug!(room = %room_id, client = client_id, "client connected");
        client_id
    }

    /// Relay `text` from `sender` to everyone else in its room.
    ///
    /// Returns `false` if the sender's link is closed.
    pub fn send(&mut self, sender: ClientId, text: &str) -> bool {
        let Some(room_id) = self.open_room_of(sender) else {
            return false;
        };

        self.relayed.push((sender, room_id.clone(), text.to_owned()));
        self.notify_room(&room_id, Some(sender), text);
        true
    }

    /// Client-side close. Other members receive `leave`.
    pub fn disconnect(&mut self, client_id: ClientId) {
        self.remove_member(client_id);
        self.links.remove(&client_id);
    }

    /// Server-side close: the client observes `Closed`.
    pub fn kick(&mut self, client_id: ClientId) {
        self.terminate(client_id, TransportEvent::Closed);
    }

    /// Transport failure: the client observes `Errored`.
    pub fn fail(&mut self, client_id: ClientId, detail: &str) {
        self.terminate(client_id, TransportEvent::Errored { detail: detail.to_owned() });
    }

    /// Inject a raw frame into one client's inbox, as if relayed.
    pub fn inject(&mut self, client_id: ClientId, raw: &str) {
        if let Some(link) = self.links.get_mut(&client_id) {
            link.inbox.push_back(TransportEvent::Message(raw.to_owned()));
        }
    }

    /// Next queued event for `client_id`.
    pub fn poll(&mut self, client_id: ClientId) -> Option<TransportEvent> {
        self.links.get_mut(&client_id)?.inbox.pop_front()
    }

    /// Whether `client_id` has undrained events.
    pub fn has_queued(&self, client_id: ClientId) -> bool {
        self.links.get(&client_id).is_some_and(|link| !link.inbox.is_empty())
    }

    /// Current members of `room_id`, ordered by connection id.
    pub fn members(&self, room_id: &RoomId) -> Vec<ClientId> {
        self.rooms.get(room_id).map(|m| m.iter().copied().collect()).unwrap_or_default()
    }

    /// Every frame relayed so far, as (sender, room, text).
    pub fn relayed(&self) -> &[(ClientId, RoomId, String)] {
        &self.relayed
    }

    fn terminate(&mut self, client_id: ClientId, event: TransportEvent) {
        if self.open_room_of(client_id).is_none() {
            return;
        }

        self.remove_member(client_id);
        if let Some(link) = self.links.get_mut(&client_id) {
            link.inbox.push_back(event);
        }
    }

    fn open_room_of(&self, client_id: ClientId) -> Option<RoomId> {
        self.links.get(&client_id).filter(|link| link.open).map(|link| link.room_id.clone())
    }

    fn remove_member(&mut self, client_id: ClientId) {
        let Some(link) = self.links.get_mut(&client_id).filter(|link| link.open) else {
            return;
        };
        link.open = false;
        let room_id = link.room_id.clone();

        if let Some(members) = self.rooms.get_mut(&room_id) {
            members.remove(&client_id);
            if members.is_empty() {
                self.rooms.remove(&room_id);
                tracing::debug!(room = %room_id, "room empty, deleted");
                return;
            }
        }

        self.notify_room(&room_id, None, &encode_control(&ControlEvent::PeerLeft));
    }

    fn notify_room(&mut self, room_id: &RoomId, except: Option<ClientId>, raw: &str) {
        let Some(members) = self.rooms.get(room_id) else {
            return;
        };

        for member in members.iter().filter(|m| Some(**m) != except) {
            if let Some(link) = self.links.get_mut(member) {
                link.inbox.push_back(TransportEvent::Message(raw.to_owned()));
            }
        }
    }
}
