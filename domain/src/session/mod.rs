//! Generation stream domain.
//!
//! - [`stream::StreamEvent`]: one event in a streamed generation

pub mod stream;
