//! Shared helpers (world axes, vector decomposition)

pub mod axes;

pub use axes::*;
