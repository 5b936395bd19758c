//! Distinct-value levels and value tallies.

use std::collections::HashMap;

use af_types::{Scalar, ScalarKey};

#[derive(Debug, Clone, PartialEq)]
pub struct LevelAnalysis {
    /// Number of distinct values; missing counts as one value.
    pub level: usize,
    /// Value frequencies in first-occurrence order, present only when
    /// `level` is within the tally threshold.
    pub tally: Option<Vec<(Scalar, usize)>>,
}

#[must_use]
pub fn analyze(values: &[Scalar], tally_threshold: usize) -> LevelAnalysis {
    let counts = tally(values);
    let level = counts.len();
    LevelAnalysis {
        level,
        tally: (level <= tally_threshold).then_some(counts),
    }
}

#[must_use]
pub fn tally(values: &[Scalar]) -> Vec<(Scalar, usize)> {
    let mut slots: HashMap<ScalarKey, usize> = HashMap::new();
    let mut counts: Vec<(Scalar, usize)> = Vec::new();
    for value in values {
        let slot = *slots.entry(value.key()).or_insert_with(|| {
            counts.push((value.clone(), 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }
    counts
}
