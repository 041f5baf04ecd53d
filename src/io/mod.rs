//! Input/output helpers.
//!
//! - CSV ingest + normalization, partition CSV export (`ingest`)
//! - split audit artifact JSON read/write (`artifact`)

pub mod artifact;
pub mod ingest;

pub use artifact::*;
pub use ingest::*;
