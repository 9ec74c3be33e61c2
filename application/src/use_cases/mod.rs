//! Use cases
//!
//! The three protocol runners and the orchestrator that dispatches to them.

pub mod orchestrator;
pub mod run_challenge;
pub mod run_companion;
pub mod run_review;
pub mod shared;

#[cfg(test)]
pub(crate) mod test_support;
