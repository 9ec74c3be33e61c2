//! Transcript domain.
//!
//! - [`entities::Message`] - one logical turn, mutated in place while streaming
//! - [`entities::MessageId`] / [`entities::PairingId`] - creation-ordered identifiers
//! - [`aggregate::Transcript`] - the ordered message collection shared by all protocols

pub mod entities;
pub mod aggregate;
