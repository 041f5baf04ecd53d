//! Leakage detection and enforcement.
//!
//! - `report`: pure per-partition group counts + pairwise overlaps
//! - `guard`: hard failure on any overlap, and the guarded split entry point

pub mod guard;
pub mod report;

pub use guard::*;
pub use report::*;
