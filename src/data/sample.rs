//! Synthetic encounter cohort generation.
//!
//! Produces tables shaped like the readmission extract (several encounters per
//! patient, a rare positive outcome, correlated risk within a patient) that
//! satisfy `readmission_contract()`. Used for demos and for exercising the
//! splitter at realistic scale.

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::LogNormal;

use crate::domain::{Dataset, Value};
use crate::error::AppError;

/// Cap on the per-encounter readmission probability.
const MAX_ENCOUNTER_RISK: f64 = 0.95;
/// Share of non-positive encounters coded as `>30` rather than `NO`.
const LATE_READMIT_SHARE: f64 = 0.35;
const FIRST_ENCOUNTER_ID: i64 = 2_000_000;
const FIRST_PATIENT_NBR: i64 = 100_000;

const RACES: [(&str, u32); 6] = [
    ("Caucasian", 75),
    ("AfricanAmerican", 19),
    ("Hispanic", 2),
    ("Asian", 1),
    ("Other", 1),
    ("Unknown", 2),
];
const AGES: [&str; 10] = [
    "[0-10)", "[10-20)", "[20-30)", "[30-40)", "[40-50)", "[50-60)", "[60-70)", "[70-80)", "[80-90)", "[90-100)",
];

pub const COHORT_FIELDS: [&str; 8] = [
    "ENCOUNTER_ID",
    "PATIENT_NBR",
    "GENDER",
    "RACE",
    "AGE",
    "TIME_IN_HOSPITAL",
    "READMITTED",
    "READMITTED_30D",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortConfig {
    pub rows: usize,
    pub patients: usize,
    /// Expected fraction of encounters with `READMITTED_30D = 1`.
    pub positive_rate: f64,
    pub seed: u64,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            rows: 10_000,
            patients: 3_000,
            positive_rate: 0.11,
            seed: 42,
        }
    }
}

struct Patient {
    nbr: i64,
    gender: &'static str,
    race: &'static str,
    age: &'static str,
    risk: f64,
}

/// Generate a synthetic encounter table.
pub fn generate_cohort(config: &CohortConfig) -> Result<Dataset, AppError> {
    if config.patients == 0 {
        return Err(AppError::new(AppError::EXIT_CONFIG, "Patient count must be > 0."));
    }
    if config.rows < config.patients {
        return Err(AppError::new(
            AppError::EXIT_CONFIG,
            format!(
                "Row count ({}) must be >= patient count ({}): every patient needs an encounter.",
                config.rows, config.patients
            ),
        ));
    }
    if !(config.positive_rate.is_finite() && (0.0..=1.0).contains(&config.positive_rate)) {
        return Err(AppError::new(AppError::EXIT_CONFIG, "Positive rate must be in [0, 1]."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let frailty = LogNormal::new(0.0, 0.5)
        .map_err(|e| AppError::new(AppError::EXIT_INTERNAL, format!("Frailty distribution error: {e}")))?;
    let utilization = LogNormal::new(0.0, 0.8)
        .map_err(|e| AppError::new(AppError::EXIT_INTERNAL, format!("Utilization distribution error: {e}")))?;
    let race_index = WeightedIndex::new(RACES.iter().map(|&(_, w)| w))
        .map_err(|e| AppError::new(AppError::EXIT_INTERNAL, format!("Race weights error: {e}")))?;

    let patients: Vec<Patient> = (0..config.patients)
        .map(|i| Patient {
            nbr: FIRST_PATIENT_NBR + i as i64,
            gender: if rng.gen_bool(0.53) { "Female" } else { "Male" },
            race: RACES[race_index.sample(&mut rng)].0,
            age: AGES[rng.gen_range(3..AGES.len())],
            risk: frailty.sample(&mut rng),
        })
        .collect();

    // Every patient gets one encounter; heavy utilizers soak up the rest.
    let weights: Vec<f64> = (0..config.patients).map(|_| utilization.sample(&mut rng)).collect();
    let extra = WeightedIndex::new(&weights)
        .map_err(|e| AppError::new(AppError::EXIT_INTERNAL, format!("Utilization weights error: {e}")))?;
    let mut owners: Vec<usize> = (0..config.patients).collect();
    owners.extend((config.patients..config.rows).map(|_| extra.sample(&mut rng)));
    owners.shuffle(&mut rng);

    // Scale risk so the encounter-weighted mean hits the requested rate.
    let mean_risk = owners.iter().map(|&p| patients[p].risk).sum::<f64>() / owners.len() as f64;

    let mut dataset = Dataset::new(COHORT_FIELDS)?;
    for (i, &p) in owners.iter().enumerate() {
        let patient = &patients[p];
        let prob = (config.positive_rate * patient.risk / mean_risk).clamp(0.0, MAX_ENCOUNTER_RISK);
        let positive = rng.gen_bool(prob);
        let code = if positive {
            "<30"
        } else if rng.gen_bool(LATE_READMIT_SHARE) {
            ">30"
        } else {
            "NO"
        };

        dataset.push_record(vec![
            Value::Int(FIRST_ENCOUNTER_ID + i as i64),
            Value::Int(patient.nbr),
            Value::from(patient.gender),
            Value::from(patient.race),
            Value::from(patient.age),
            Value::Int(rng.gen_range(1..=14)),
            Value::from(code),
            Value::Int(i64::from(positive)),
        ])?;
    }

    Ok(dataset)
}
