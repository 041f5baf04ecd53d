//! Split configuration.
//!
//! A `SplitConfiguration` is validated once at construction and is immutable
//! afterwards; there is no process-wide default object.

use serde::{Deserialize, Serialize};

use crate::domain::SplitLabel;
use crate::error::SplitError;

/// Absolute tolerance on `train + validation + test == 1.0`.
pub const FRACTION_SUM_TOLERANCE: f64 = 1e-6;

/// Whether a fraction total is within `FRACTION_SUM_TOLERANCE` of 1.0.
pub fn fraction_sum_within_tolerance(total: f64) -> bool {
    (total - 1.0).abs() <= FRACTION_SUM_TOLERANCE
}

/// Plain fraction triple, as recorded in audit artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitFractions {
    pub train: f64,
    pub validation: f64,
    pub test: f64,
}

/// Target size fractions plus the seed that drives group assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitConfiguration {
    train_fraction: f64,
    validation_fraction: f64,
    test_fraction: f64,
    random_seed: u64,
}

impl SplitConfiguration {
    /// Validate and build a configuration.
    ///
    /// Each fraction must be finite and non-negative, and the three must sum to
    /// 1.0 within `FRACTION_SUM_TOLERANCE`. A zero fraction leaves that partition
    /// empty.
    pub fn new(
        train_fraction: f64,
        validation_fraction: f64,
        test_fraction: f64,
        random_seed: u64,
    ) -> Result<Self, SplitError> {
        for (name, value) in [
            ("train_fraction", train_fraction),
            ("validation_fraction", validation_fraction),
            ("test_fraction", test_fraction),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SplitError::Configuration(format!(
                    "`{name}` must be finite and >= 0 (got {value})"
                )));
            }
        }

        let total = train_fraction + validation_fraction + test_fraction;
        if !fraction_sum_within_tolerance(total) {
            return Err(SplitError::Configuration(format!(
                "train + validation + test fractions must equal 1.0 within {FRACTION_SUM_TOLERANCE:e} (got {total})"
            )));
        }

        Ok(Self {
            train_fraction,
            validation_fraction,
            test_fraction,
            random_seed,
        })
    }

    pub fn from_fractions(fractions: SplitFractions, random_seed: u64) -> Result<Self, SplitError> {
        Self::new(fractions.train, fractions.validation, fractions.test, random_seed)
    }

    pub fn train_fraction(&self) -> f64 {
        self.train_fraction
    }

    pub fn validation_fraction(&self) -> f64 {
        self.validation_fraction
    }

    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    pub fn random_seed(&self) -> u64 {
        self.random_seed
    }

    pub fn fractions(&self) -> SplitFractions {
        SplitFractions {
            train: self.train_fraction,
            validation: self.validation_fraction,
            test: self.test_fraction,
        }
    }

    /// Share of the post-train remainder that goes to validation.
    ///
    /// `0.0` when validation and test are both zero; the remainder is empty then.
    pub fn validation_share_of_remainder(&self) -> f64 {
        let remainder = self.validation_fraction + self.test_fraction;
        if remainder > 0.0 {
            self.validation_fraction / remainder
        } else {
            0.0
        }
    }

    /// Whether `label` is meant to receive any rows.
    pub fn is_populated(&self, label: SplitLabel) -> bool {
        let fraction = match label {
            SplitLabel::Train => self.train_fraction,
            SplitLabel::Validation => self.validation_fraction,
            SplitLabel::Test => self.test_fraction,
        };
        fraction > 0.0
    }

    /// Number of partitions with a non-zero fraction.
    pub fn populated_partitions(&self) -> usize {
        SplitLabel::ALL.into_iter().filter(|&l| self.is_populated(l)).count()
    }
}

impl Default for SplitConfiguration {
    /// 70/15/15 with seed 42.
    fn default() -> Self {
        Self {
            train_fraction: 0.7,
            validation_fraction: 0.15,
            test_fraction: 0.15,
            random_seed: 42,
        }
    }
}
