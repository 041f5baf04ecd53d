//! Data-side collaborators of the splitting core.
//!
//! - the readmission data contract and its validator (`contract`, `validate`)
//! - seeded synthetic encounter cohorts (`sample`)

pub mod contract;
pub mod sample;
pub mod validate;

pub use contract::*;
pub use sample::*;
pub use validate::*;
