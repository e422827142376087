//! Session invariants checked while simulated clients run.
//!
//! [`SimDriver`](crate::SimDriver) captures each App into a [`ClientSnapshot`]
//! after every render and runs the [`InvariantRegistry::standard`] checks:
//! dense transcript sequences, a status line that matches the connection,
//! and local chat entries backed by transmitted frames.

mod checks;
mod snapshot;

pub use checks::{LocalEntriesMatchSent, SequenceDensity, StatusAgreesWithState};
pub use snapshot::{ClientSnapshot, SystemSnapshot};

/// Outcome of one check.
pub type InvariantResult = Result<(), Violation>;

/// A broken session property, naming the client it was seen on.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Check that failed.
    pub invariant: &'static str,
    /// Offending client and values.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property of rendered session state.
pub trait Invariant: Send + Sync {
    /// Short name used in violation reports.
    fn name(&self) -> &'static str;

    /// Check every client in `state`.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Checks run by [`SimDriver`](crate::SimDriver) after each render.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Sequence density, status agreement and local entry accounting.
    pub fn standard() -> Self {
        Self {
            invariants: vec![
                Box::new(SequenceDensity),
                Box::new(StatusAgreesWithState),
                Box::new(LocalEntriesMatchSent),
            ],
        }
    }

    /// Every violation in `state`.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Panic listing every violation; `context` says when the snapshot was taken.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }
}

#[cfg(test)]
mod tests {
    use roomchat_core::{ConnectionState, LinkStatus};

    use super::*;

    #[test]
    fn clients_without_sessions_pass() {
        let registry = InvariantRegistry::standard();
        let snapshot =
            SystemSnapshot::from_clients(vec![ClientSnapshot::new(0), ClientSnapshot::new(1)]);
        assert!(registry.check_all(&snapshot).is_ok());
    }

    #[test]
    fn every_broken_property_is_reported() {
        let registry = InvariantRegistry::standard();
        let broken = ClientSnapshot {
            state: Some(ConnectionState::Connected),
            status: Some(LinkStatus::Disconnected),
            sequences: vec![0, 2],
            ..ClientSnapshot::new(4)
        };

        let violations = registry.check_all(&SystemSnapshot::single(broken)).unwrap_err();
        let names: Vec<_> = violations.iter().map(|v| v.invariant).collect();

        assert_eq!(names, vec!["sequence_density", "status_agrees_with_state"]);
        assert!(violations[0].message.contains("client 4"));
    }
}
