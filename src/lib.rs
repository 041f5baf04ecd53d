//! `readmit-split` library crate.
//!
//! Group-aware train/validation/test splitting for encounter-level readmission
//! data: every patient lands in exactly one partition, and a leakage guard
//! verifies that before anything downstream sees the partitions.
//!
//! The binary (`readmit`) is a thin wrapper around this library so that:
//!
//! - the splitting core is testable without spawning processes
//! - the core (`split`, `leakage`, `domain`) stays free of I/O and logging

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod leakage;
pub mod report;
pub mod settings;
pub mod split;
