//! Group-aware train/validation/test splitting.
//!
//! - `config`: validated split fractions + seed
//! - `shuffle`: the grouped shuffle-split primitive (one binary split)
//! - `splitter`: the two-stage three-way split built on top of it

pub mod config;
pub mod shuffle;
pub mod splitter;

pub use config::*;
pub use splitter::*;
