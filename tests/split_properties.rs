use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use readmit_split::domain::{Dataset, GroupKey, SplitLabel, Value};
use readmit_split::split::{MIN_GROUPS, SplitConfiguration, SplitResult, group_split};

fn build(rows: &[(i64, bool)]) -> Dataset {
    Dataset::from_records(
        ["ROW", "PATIENT_NBR", "READMITTED_30D"],
        rows.iter()
            .enumerate()
            .map(|(i, &(g, y))| vec![Value::Int(i as i64), Value::Int(g), Value::Int(i64::from(y))])
            .collect(),
    )
    .unwrap()
}

fn distinct_groups(rows: &[(i64, bool)]) -> usize {
    rows.iter().map(|(g, _)| g).collect::<HashSet<_>>().len()
}

fn config_strategy() -> impl Strategy<Value = SplitConfiguration> {
    (0.2f64..0.85, 0.1f64..0.9, any::<u64>()).prop_map(|(train, val_share, seed)| {
        let validation = (1.0 - train) * val_share;
        let test = 1.0 - train - validation;
        SplitConfiguration::new(train, validation, test, seed).unwrap()
    })
}

fn rows_strategy() -> impl Strategy<Value = Vec<(i64, bool)>> {
    prop::collection::vec((0i64..40, prop::bool::weighted(0.2)), 3..250)
}

fn label_by_group(ds: &Dataset, result: &SplitResult) -> HashMap<GroupKey, HashSet<SplitLabel>> {
    let mut seen: HashMap<GroupKey, HashSet<SplitLabel>> = HashMap::new();
    for label in SplitLabel::ALL {
        for &row in result.rows(label) {
            let key = ds.records()[row][1].group_key().unwrap();
            seen.entry(key).or_default().insert(label);
        }
    }
    seen
}

proptest! {
    #[test]
    fn groups_never_straddle_partitions(rows in rows_strategy(), config in config_strategy()) {
        prop_assume!(distinct_groups(&rows) >= MIN_GROUPS);
        let ds = build(&rows);
        let result = group_split(&ds, "PATIENT_NBR", "READMITTED_30D", &config).unwrap();

        for (key, labels) in label_by_group(&ds, &result) {
            prop_assert_eq!(labels.len(), 1, "group {} in {:?}", key, labels);
        }
    }

    #[test]
    fn every_row_assigned_exactly_once(rows in rows_strategy(), config in config_strategy()) {
        prop_assume!(distinct_groups(&rows) >= MIN_GROUPS);
        let ds = build(&rows);
        let result = group_split(&ds, "PATIENT_NBR", "READMITTED_30D", &config).unwrap();

        let mut all: Vec<usize> = SplitLabel::ALL.iter().flat_map(|&l| result.rows(l).to_vec()).collect();
        all.sort_unstable();
        prop_assert_eq!(all, (0..rows.len()).collect::<Vec<_>>());
        for label in SplitLabel::ALL {
            prop_assert!(!result.rows(label).is_empty());
        }
    }

    #[test]
    fn split_is_deterministic(rows in rows_strategy(), config in config_strategy()) {
        prop_assume!(distinct_groups(&rows) >= MIN_GROUPS);
        let ds = build(&rows);
        let a = group_split(&ds, "PATIENT_NBR", "READMITTED_30D", &config).unwrap();
        let b = group_split(&ds, "PATIENT_NBR", "READMITTED_30D", &config).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn too_few_groups_is_insufficient_data(group in 0i64..5, n in 1usize..20, config in config_strategy()) {
        let rows: Vec<(i64, bool)> = (0..n).map(|i| (group + (i % 2) as i64, i % 3 == 0)).collect();
        let ds = build(&rows);
        let err = group_split(&ds, "PATIENT_NBR", "READMITTED_30D", &config).unwrap_err();
        prop_assert_eq!(err.kind(), readmit_split::error::ErrorKind::InsufficientData);
    }
}
