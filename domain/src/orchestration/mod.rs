//! Orchestration domain.
//!
//! - [`protocol::Protocol`]: Review, Companion or Challenge
//! - [`run_state::SessionSelection`]: the two chosen agents and the active protocol
//! - [`run_state::RunState`]: processing flag and last error

pub mod protocol;
pub mod run_state;
