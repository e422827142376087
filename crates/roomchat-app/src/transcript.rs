//! Ordered room transcript.
//!
//! The [`Transcript`] is the single source of truth for render order. Local
//! sends, remote frames and system notices all land in one sequence space in
//! the order the client observes them. Entries are never re-sorted, merged
//! or removed.

use std::fmt;

use roomchat_proto::ControlEvent;

/// Text of the notice appended when a peer joins.
pub const PEER_JOINED_TEXT: &str = "A peer joined the room";

/// Text of the notice appended when a peer leaves.
pub const PEER_LEFT_TEXT: &str = "A peer left the room";

/// Where a chat entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Typed by this client.
    Local,
    /// Relayed from another participant.
    Remote,
}

/// Kind of system notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemKind {
    /// A peer joined.
    PeerJoined,
    /// A peer left.
    PeerLeft,
}

impl SystemKind {
    /// Fixed human-readable text for this notice.
    pub fn text(self) -> &'static str {
        match self {
            Self::PeerJoined => PEER_JOINED_TEXT,
            Self::PeerLeft => PEER_LEFT_TEXT,
        }
    }
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    /// Position in the transcript.
    pub sequence: u64,
    /// Message text.
    pub text: String,
    /// Local or remote.
    pub origin: Origin,
}

/// A notice derived from a control event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemEntry {
    /// Position in the transcript.
    pub sequence: u64,
    /// Notice text.
    pub text: String,
    /// Event that produced the notice.
    pub kind: SystemKind,
}

/// One transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Chat message.
    Chat(ChatEntry),
    /// System notice.
    System(SystemEntry),
}

impl Entry {
    /// Position in the transcript.
    pub fn sequence(&self) -> u64 {
        match self {
            Self::Chat(entry) => entry.sequence,
            Self::System(entry) => entry.sequence,
        }
    }

    /// Entry text without any sender label.
    pub fn text(&self) -> &str {
        match self {
            Self::Chat(entry) => &entry.text,
            Self::System(entry) => &entry.text,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat(ChatEntry { text, origin: Origin::Local, .. }) => write!(f, "You: {text}"),
            Self::Chat(ChatEntry { text, origin: Origin::Remote, .. }) => {
                write!(f, "Peer: {text}")
            },
            Self::System(entry) => write!(f, "* {}", entry.text),
        }
    }
}

/// Append-only, ordered list of entries.
///
/// # Invariants
///
/// - `entries()[i].sequence() == i` for every entry
/// - Entries appear in call order of the `push_*` methods
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message typed by this client.
    ///
    /// No validation here; the session rejects blank input before calling.
    pub fn push_local(&mut self, text: String) -> u64 {
        self.push_chat(text, Origin::Local)
    }

    /// Append a message relayed from a peer, unconditionally.
    pub fn push_remote(&mut self, text: String) -> u64 {
        self.push_chat(text, Origin::Remote)
    }

    /// Append the notice for a control event.
    ///
    /// Returns `None` for events that produce no entry (welcome).
    pub fn push_system(&mut self, event: &ControlEvent) -> Option<u64> {
        let kind = match event {
            ControlEvent::PeerJoined => SystemKind::PeerJoined,
            ControlEvent::PeerLeft => SystemKind::PeerLeft,
            ControlEvent::Welcome { .. } => return None,
        };

        let sequence = self.next_sequence();
        self.entries.push(Entry::System(SystemEntry {
            sequence,
            text: kind.text().to_owned(),
            kind,
        }));
        Some(sequence)
    }

    fn push_chat(&mut self, text: String, origin: Origin) -> u64 {
        let sequence = self.next_sequence();
        self.entries.push(Entry::Chat(ChatEntry { sequence, text, origin }));
        sequence
    }

    fn next_sequence(&self) -> u64 {
        self.entries.len() as u64
    }

    /// All entries in render order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Iterate entries in render order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Chat entries only, in render order.
    pub fn chat_entries(&self) -> impl Iterator<Item = &ChatEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Chat(chat) => Some(chat),
            Entry::System(_) => None,
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
