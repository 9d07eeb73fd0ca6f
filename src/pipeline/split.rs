//! Stratified train/test split

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::PipelineError;

/// Row indices of the two partitions, each sorted ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split rows into train and test partitions that preserve class balance.
///
/// The test partition holds `ceil(test_fraction * n)` rows. Each class
/// contributes to it in proportion to its share of `labels`, with leftover
/// slots assigned by largest remainder. Rows are drawn by shuffling each
/// class with a `StdRng` seeded from `seed`, so the split is reproducible.
pub fn stratified_split(
    labels: &[u8],
    test_fraction: f64,
    seed: u64,
) -> Result<SplitIndices, PipelineError> {
    let n = labels.len();
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::Split(format!(
            "test fraction must be between 0 and 1, got {}",
            test_fraction
        )));
    }

    let mut by_class: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
    for (row, &label) in labels.iter().enumerate() {
        by_class.entry(label).or_default().push(row);
    }

    if by_class.len() < 2 {
        return Err(PipelineError::Split(format!(
            "the target has {} class(es); at least 2 are required",
            by_class.len()
        )));
    }
    if let Some((label, rows)) = by_class.iter().find(|(_, rows)| rows.len() < 2) {
        return Err(PipelineError::Split(format!(
            "the least populated class ({}) has only {} member; every class needs at least 2",
            label,
            rows.len()
        )));
    }

    let n_classes = by_class.len();
    let n_test = (test_fraction * n as f64).ceil() as usize;
    let n_train = n - n_test;
    if n_test < n_classes || n_train < n_classes {
        return Err(PipelineError::Split(format!(
            "{} rows cannot give both partitions at least one row of each of {} classes",
            n, n_classes
        )));
    }

    let allocation = allocate_test_rows(&by_class, n_test, n);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);

    for ((_, rows), take) in by_class.iter().zip(allocation) {
        let mut rows = rows.clone();
        rows.shuffle(&mut rng);
        test.extend_from_slice(&rows[..take]);
        train.extend_from_slice(&rows[take..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(SplitIndices { train, test })
}

/// Test rows per class: proportional floor, then largest remainder.
/// Each class keeps at least one row on both sides.
fn allocate_test_rows(by_class: &BTreeMap<u8, Vec<usize>>, n_test: usize, n: usize) -> Vec<usize> {
    let shares: Vec<f64> = by_class
        .values()
        .map(|rows| n_test as f64 * rows.len() as f64 / n as f64)
        .collect();
    let mut allocation: Vec<usize> = shares
        .iter()
        .zip(by_class.values())
        .map(|(share, rows)| (share.floor() as usize).clamp(1, rows.len() - 1))
        .collect();

    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = shares[a] - shares[a].floor();
        let rb = shares[b] - shares[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });

    let sizes: Vec<usize> = by_class.values().map(Vec::len).collect();
    let mut assigned: usize = allocation.iter().sum();

    while assigned < n_test {
        let Some(&class) = order.iter().find(|&&c| allocation[c] < sizes[c] - 1) else {
            break;
        };
        allocation[class] += 1;
        assigned += 1;
        order.retain(|&c| c != class);
        order.push(class);
    }
    while assigned > n_test {
        let Some(class) = (0..allocation.len())
            .filter(|&c| allocation[c] > 1)
            .max_by(|&a, &b| allocation[a].cmp(&allocation[b]))
        else {
            break;
        };
        allocation[class] -= 1;
        assigned -= 1;
    }

    allocation
}
