//! Deterministic simulation harness for Roomchat.
//!
//! In-memory implementations of the room server and of the [`Driver`] trait
//! for deterministic, reproducible testing of the full client runtime.
//!
//! # Components
//!
//! - [`SimEnv`]: Seeded randomness
//! - [`SimRelay`]: Room server stand-in (allocation, relay, join/leave)
//! - [`SimDriver`]: Scripted input and relay-backed transport
//!
//! [`SimDriver::with_invariants`] checks [`InvariantRegistry::standard()`]
//! after every render, so any scripted run doubles as a session property test.
//!
//! [`Driver`]: roomchat_app::Driver

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_env;
pub mod sim_relay;

pub use invariants::{
    ClientSnapshot, Invariant, InvariantRegistry, InvariantResult, LocalEntriesMatchSent,
    SequenceDensity, StatusAgreesWithState, SystemSnapshot, Violation,
};
pub use sim_driver::{SimDriver, SimDriverError, SimInput};
pub use sim_env::SimEnv;
pub use sim_relay::{ClientId, SharedRelay, SimRelay, create_shared_relay, lock_relay};
