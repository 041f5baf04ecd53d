//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the in-memory table model (`Dataset`, `DatasetView`, `Value`)
//! - canonical group identifiers (`GroupKey`)
//! - partition labels and per-partition views (`SplitLabel`, `PartitionViews`)

pub mod types;

pub use types::*;
