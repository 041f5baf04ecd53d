//! Grouped shuffle-split primitive.
//!
//! Splits a set of entity groups into two sides so that the left side holds
//! roughly `left_fraction` of the *records*. Groups never straddle sides.
//!
//! Stratification is best effort: groups with at least one positive label and
//! groups with none are shuffled and filled separately, so each stratum lands
//! near the target fraction on its own. Group atomicity always wins over label
//! balance.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::GroupKey;

/// Aggregated view of one entity group.
#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub key: GroupKey,
    /// Row indices into the source dataset, ascending.
    pub rows: Vec<usize>,
    /// Number of rows with a positive target.
    pub positives: usize,
}

impl GroupSummary {
    pub fn size(&self) -> usize {
        self.rows.len()
    }
}

/// Positions (into the input slice) assigned to each side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinarySplit {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

/// SplitMix64 increment.
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Derive a per-stage seed so the two stages don't replay the same shuffle.
///
/// This is the `stage`-th output of SplitMix64 started at `seed`. It is fixed
/// arithmetic, so a recorded seed reproduces the split on any toolchain.
pub fn stage_seed(seed: u64, stage: u8) -> u64 {
    let mut z = seed.wrapping_add(GOLDEN_GAMMA.wrapping_mul(u64::from(stage)));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Split `groups` into left/right by record count.
///
/// `groups` must already be in a canonical order (the splitter sorts by
/// `GroupKey`); the result is then a pure function of the groups and `seed`.
/// The caller guarantees `groups.len() >= min_left + min_right`.
pub fn grouped_shuffle_split(
    groups: &[&GroupSummary],
    left_fraction: f64,
    seed: u64,
    min_left: usize,
    min_right: usize,
) -> BinarySplit {
    debug_assert!(groups.len() >= min_left + min_right);

    let mut rng = StdRng::seed_from_u64(seed);
    let (mut positive, mut negative): (Vec<usize>, Vec<usize>) =
        (0..groups.len()).partition(|&pos| groups[pos].positives > 0);

    let mut split = BinarySplit::default();
    for stratum in [&mut positive, &mut negative] {
        stratum.shuffle(&mut rng);

        let stratum_rows: usize = stratum.iter().map(|&pos| groups[pos].size()).sum();
        let target = left_fraction * stratum_rows as f64;
        let mut filled = 0usize;

        for &pos in stratum.iter() {
            let size = groups[pos].size();
            let with = ((filled + size) as f64 - target).abs();
            let without = (filled as f64 - target).abs();
            if with < without {
                split.left.push(pos);
                filled += size;
            } else {
                split.right.push(pos);
            }
        }
    }

    top_up(groups, &mut split.left, &mut split.right, min_left);
    top_up(groups, &mut split.right, &mut split.left, min_right);
    split
}

/// Move the smallest groups from `long` to `short` until `short` has `min` groups.
fn top_up(groups: &[&GroupSummary], short: &mut Vec<usize>, long: &mut Vec<usize>, min: usize) {
    while short.len() < min {
        let smallest = long
            .iter()
            .enumerate()
            .min_by_key(|&(_, &pos)| (groups[pos].size(), pos))
            .map(|(idx, _)| idx);
        let Some(idx) = smallest else { break };
        short.push(long.swap_remove(idx));
    }
}
