//! Live rendering of a run's transcript

pub mod reporter;
