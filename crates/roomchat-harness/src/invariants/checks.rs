//! Checks registered by [`InvariantRegistry::standard`](super::InvariantRegistry::standard).

use roomchat_core::{ConnectionState, LinkStatus};

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// Transcript sequences are dense and in render order.
///
/// Entry `i` carries sequence `i`. A gap or reordering means an entry was
/// lost, inserted out of order, or sorted after the fact.
pub struct SequenceDensity;

impl Invariant for SequenceDensity {
    fn name(&self) -> &'static str {
        "sequence_density"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            for (index, sequence) in client.sequences.iter().enumerate() {
                if *sequence != index as u64 {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "client {}: entry {index} has sequence {sequence}",
                            client.id
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Shown status agrees with the connection state.
///
/// Connected must show connected; Idle, Connecting and Errored must show
/// disconnected. Disconnected is unconstrained since a local teardown emits
/// no status.
pub struct StatusAgreesWithState;

impl Invariant for StatusAgreesWithState {
    fn name(&self) -> &'static str {
        "status_agrees_with_state"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let (Some(conn), Some(status)) = (client.state, client.status) else {
                continue;
            };

            let expected = match conn {
                ConnectionState::Connected => LinkStatus::Connected,
                ConnectionState::Idle | ConnectionState::Connecting | ConnectionState::Errored => {
                    LinkStatus::Disconnected
                },
                ConnectionState::Disconnected => continue,
            };

            if status != expected {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {}: state {conn:?} shown as {status:?}, expected {expected:?}",
                        client.id
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Every local entry corresponds to exactly one transmitted frame.
///
/// A local entry without a send means a message was shown but never left
/// the client; a send without an entry means it was transmitted unseen.
pub struct LocalEntriesMatchSent;

impl Invariant for LocalEntriesMatchSent {
    fn name(&self) -> &'static str {
        "local_entries_match_sent"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            if client.local_entries as u64 != client.sent_frames {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {}: {} local entries but {} frames sent",
                        client.id, client.local_entries, client.sent_frames
                    ),
                });
            }
        }
        Ok(())
    }
}
